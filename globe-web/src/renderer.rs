/// Per-frame draw sequence for the globe
use globe_core::ModelView;
use nalgebra::Matrix4;
use web_sys::{WebGl2RenderingContext as GL, WebGlBuffer};

use crate::buffers::GlobeBuffers;
use crate::shader::ProgramInfo;
use crate::texture::GlobeTexture;

/// Issues one indexed draw of the globe per call
pub struct FrameRenderer {
    program: ProgramInfo,
    buffers: GlobeBuffers,
    texture: GlobeTexture,
    projection: Matrix4<f32>,
    clear_color: [f32; 4],
}

impl FrameRenderer {
    pub fn new(
        program: ProgramInfo,
        buffers: GlobeBuffers,
        texture: GlobeTexture,
        projection: Matrix4<f32>,
        clear_color: [f32; 4],
    ) -> Self {
        Self {
            program,
            buffers,
            texture,
            projection,
            clear_color,
        }
    }

    pub fn texture(&self) -> &GlobeTexture {
        &self.texture
    }

    pub fn draw(&self, gl: &GL, model_view: &ModelView) {
        let [r, g, b, a] = self.clear_color;
        gl.clear_color(r, g, b, a);
        gl.clear_depth(1.0);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_func(GL::LEQUAL);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        let attribs = self.program.attribs;
        bind_attribute(gl, &self.buffers.position, attribs.position, 3);
        bind_attribute(gl, &self.buffers.tex_coord, attribs.tex_coord, 2);
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&self.buffers.indices));

        gl.use_program(Some(&self.program.program));

        let uniforms = &self.program.uniforms;
        gl.uniform_matrix4fv_with_f32_array(
            Some(&uniforms.projection),
            false,
            self.projection.as_slice(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            Some(&uniforms.model_view),
            false,
            model_view.as_slice(),
        );

        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(self.texture.handle()));
        gl.uniform1i(Some(&uniforms.sampler), 0);

        gl.draw_elements_with_i32(
            GL::TRIANGLES,
            self.buffers.index_count,
            GL::UNSIGNED_INT,
            0,
        );
    }
}

/// Point a vertex attribute at a tightly packed float buffer
fn bind_attribute(gl: &GL, buffer: &WebGlBuffer, location: u32, components: i32) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    gl.vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
    gl.enable_vertex_attrib_array(location);
}
