use web_sys as web;

const OVERLAY_ID: &str = "loading-overlay";
const LABEL_ID: &str = "loading-label";
const BAR_ID: &str = "loading-bar";

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        let _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        let _ = el.set_attribute("style", "display:none");
    }
}

pub fn set_progress(document: &web::Document, percent: u32) {
    if let Some(el) = document.get_element_by_id(LABEL_ID) {
        el.set_text_content(Some(&format!("Loading images: {percent}%")));
    }
    if let Some(el) = document.get_element_by_id(BAR_ID) {
        let _ = el.set_attribute("style", &format!("width:{percent}%"));
    }
}
