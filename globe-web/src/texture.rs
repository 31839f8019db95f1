/// Asynchronous texture loading
use std::cell::Cell;
use std::rc::Rc;

use globe_core::config::TextureSettings;
use globe_core::GlobeError;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlImageElement, WebGl2RenderingContext as GL, WebGlTexture};

use crate::dom::js_error;

/// Globe surface texture.
///
/// The texture is usable immediately: it holds a single placeholder texel
/// until the image has been decoded, after which the image replaces it in
/// place.
#[derive(Debug, Clone)]
pub struct GlobeTexture {
    texture: WebGlTexture,
    ready: Rc<Cell<bool>>,
}

impl GlobeTexture {
    pub fn load(gl: &GL, settings: &TextureSettings) -> Result<Self, GlobeError> {
        let texture = gl.create_texture().ok_or(GlobeError::TextureAllocation)?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            1,
            1,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            Some(settings.placeholder_rgba.as_slice()),
        )
        .map_err(js_error)?;
        // No mipmaps yet, so sampling must not depend on them
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        let image = HtmlImageElement::new().map_err(js_error)?;
        image.set_src(&settings.url);

        let ready = Rc::new(Cell::new(false));
        spawn_local(decode_and_upload(
            gl.clone(),
            texture.clone(),
            image,
            settings.url.clone(),
            ready.clone(),
        ));

        Ok(Self { texture, ready })
    }

    pub fn handle(&self) -> &WebGlTexture {
        &self.texture
    }

    /// Whether the image has replaced the placeholder
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }
}

async fn decode_and_upload(
    gl: GL,
    texture: WebGlTexture,
    image: HtmlImageElement,
    url: String,
    ready: Rc<Cell<bool>>,
) {
    if let Err(err) = JsFuture::from(image.decode()).await {
        log::warn!("failed to load texture {}: {:?}", url, err);
        return;
    }

    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    // Image rows run top-down; texture rows run bottom-up
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
    let uploaded = gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        &image,
    );
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);

    if let Err(err) = uploaded {
        log::warn!("failed to upload texture {}: {:?}", url, err);
        return;
    }

    gl.generate_mipmap(GL::TEXTURE_2D);
    gl.tex_parameteri(
        GL::TEXTURE_2D,
        GL::TEXTURE_MIN_FILTER,
        GL::LINEAR_MIPMAP_LINEAR as i32,
    );
    ready.set(true);
    log::info!(
        "loaded texture {} ({}x{})",
        url,
        image.natural_width(),
        image.natural_height()
    );
}
