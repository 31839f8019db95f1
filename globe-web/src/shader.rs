/// Shader compilation and program linking
use globe_core::{GlobeError, ShaderStage};
use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlShader, WebGlUniformLocation};

pub const VERTEX_SHADER: &str = include_str!("shaders/globe.vert");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/globe.frag");

pub const POSITION_ATTRIBUTE: &str = "aPosition";
pub const TEX_COORD_ATTRIBUTE: &str = "aTexCoord";
pub const PROJECTION_UNIFORM: &str = "uProjectionMatrix";
pub const MODEL_VIEW_UNIFORM: &str = "uModelViewMatrix";
pub const SAMPLER_UNIFORM: &str = "uTexture";

/// Compile a single shader stage, returning the driver's info log on failure
pub fn compile_shader(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader, GlobeError> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl.create_shader(kind).ok_or_else(|| GlobeError::ShaderCompile {
        stage,
        log: "unable to create shader object".to_string(),
    })?;

    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        return Ok(shader);
    }

    let log = gl
        .get_shader_info_log(&shader)
        .unwrap_or_else(|| "unknown compiler error".to_string());
    gl.delete_shader(Some(&shader));
    Err(GlobeError::ShaderCompile { stage, log })
}

pub fn link_program(
    gl: &GL,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, GlobeError> {
    let program = gl
        .create_program()
        .ok_or_else(|| GlobeError::ShaderLink("unable to create program object".to_string()))?;

    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if linked {
        return Ok(program);
    }

    let log = gl
        .get_program_info_log(&program)
        .unwrap_or_else(|| "unknown linker error".to_string());
    gl.delete_program(Some(&program));
    Err(GlobeError::ShaderLink(log))
}

/// Compile both stages and link them into a program.
///
/// The shader objects are released once the program owns them or when any
/// step fails.
pub fn build_program(
    gl: &GL,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<WebGlProgram, GlobeError> {
    let vertex = compile_shader(gl, ShaderStage::Vertex, vertex_source)?;
    let fragment = match compile_shader(gl, ShaderStage::Fragment, fragment_source) {
        Ok(fragment) => fragment,
        Err(err) => {
            gl.delete_shader(Some(&vertex));
            return Err(err);
        }
    };

    let program = link_program(gl, &vertex, &fragment);
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));
    program
}

#[derive(Debug, Clone, Copy)]
pub struct AttribLocations {
    pub position: u32,
    pub tex_coord: u32,
}

#[derive(Debug, Clone)]
pub struct UniformLocations {
    pub projection: WebGlUniformLocation,
    pub model_view: WebGlUniformLocation,
    pub sampler: WebGlUniformLocation,
}

/// A linked program together with its resolved attribute and uniform locations
#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub program: WebGlProgram,
    pub attribs: AttribLocations,
    pub uniforms: UniformLocations,
}

impl ProgramInfo {
    pub fn locate(gl: &GL, program: WebGlProgram) -> Result<Self, GlobeError> {
        let attribs = AttribLocations {
            position: attrib_location(gl, &program, POSITION_ATTRIBUTE)?,
            tex_coord: attrib_location(gl, &program, TEX_COORD_ATTRIBUTE)?,
        };
        let uniforms = UniformLocations {
            projection: uniform_location(gl, &program, PROJECTION_UNIFORM)?,
            model_view: uniform_location(gl, &program, MODEL_VIEW_UNIFORM)?,
            sampler: uniform_location(gl, &program, SAMPLER_UNIFORM)?,
        };

        Ok(Self {
            program,
            attribs,
            uniforms,
        })
    }
}

fn attrib_location(gl: &GL, program: &WebGlProgram, name: &str) -> Result<u32, GlobeError> {
    // Negative means the attribute is absent or was optimized out
    u32::try_from(gl.get_attrib_location(program, name))
        .map_err(|_| GlobeError::MissingAttribute(name.to_string()))
}

fn uniform_location(
    gl: &GL,
    program: &WebGlProgram,
    name: &str,
) -> Result<WebGlUniformLocation, GlobeError> {
    gl.get_uniform_location(program, name)
        .ok_or_else(|| GlobeError::MissingUniform(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_declare_bound_names() {
        for name in [
            POSITION_ATTRIBUTE,
            TEX_COORD_ATTRIBUTE,
            PROJECTION_UNIFORM,
            MODEL_VIEW_UNIFORM,
        ] {
            assert!(VERTEX_SHADER.contains(name), "vertex shader lacks {}", name);
        }
        assert!(FRAGMENT_SHADER.contains(SAMPLER_UNIFORM));
    }

    #[test]
    fn test_fragment_declares_precision() {
        // GLSL ES 1.00 fragment shaders have no default float precision
        assert!(FRAGMENT_SHADER.contains("precision mediump float"));
    }
}
