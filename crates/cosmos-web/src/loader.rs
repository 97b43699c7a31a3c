use crate::Shared;
use anyhow::{anyhow, bail};
use cosmos_render::{decode_image, DecodedImage, MAX_TEXTURE_DIM};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        bail!("{url}: HTTP {}", resp.status());
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

async fn fetch_image(url: &str) -> anyhow::Result<DecodedImage> {
    let bytes = fetch_bytes(url).await?;
    Ok(decode_image(&bytes, MAX_TEXTURE_DIM)?)
}

/// Start one fetch per catalog entry. Results land in whatever order the
/// network delivers them.
pub fn spawn_all(shared: &Rc<Shared>) {
    let urls: Vec<(usize, String)> = {
        let scene = shared.scene.borrow();
        let catalog = scene.catalog();
        (0..catalog.len())
            .filter_map(|i| catalog.url(i).map(|u| (i, u)))
            .collect()
    };
    log::info!("[loader] fetching {} images", urls.len());
    for (index, url) in urls {
        let shared = shared.clone();
        spawn_local(async move {
            let result = fetch_image(&url).await;
            if !shared.alive.get() {
                return;
            }
            match result {
                Ok(img) => {
                    let mut events = shared.events.borrow_mut();
                    let slot = shared.scene.borrow_mut().on_image_loaded(
                        index,
                        img.width,
                        img.height,
                        &mut events,
                    );
                    if let Some(slot) = slot {
                        shared.renderer.borrow_mut().upload_texture(slot, &img);
                    }
                }
                Err(e) => {
                    log::warn!("[loader] {url}: {e:#}");
                    shared.scene.borrow_mut().on_image_failed(index);
                }
            }
        });
    }
}
