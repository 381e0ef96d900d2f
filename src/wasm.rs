use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn generate_contract_source(workspace_snapshot: &str) -> Result<String, JsValue> {
    let registry = crate::schema::Registry::standard();
    crate::generate_source(workspace_snapshot, &registry)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn toolbox_xml() -> Result<String, JsValue> {
    let registry = crate::schema::Registry::standard();
    crate::toolbox::toolbox_xml(&registry).map_err(|e| JsValue::from_str(&e.to_string()))
}
