use crate::schema::{category_colour, Registry};
use anyhow::{Context, Result};
use xmltree::{Element, EmitterConfig, XMLNode};

#[derive(Debug, Clone)]
pub struct ToolboxCategory {
    pub name: &'static str,
    pub colour: &'static str,
    pub block_types: Vec<&'static str>,
}

// Palette structure for the editing surface, derived from the registry
// so it can never offer a block the generator has no emitter for.
// Categories keep first-appearance order, blocks keep registry order.
pub fn toolbox_categories(registry: &Registry) -> Vec<ToolboxCategory> {
    let mut categories: Vec<ToolboxCategory> = Vec::new();
    for kind in registry.kinds() {
        let Some(schema) = registry.schema(kind) else {
            continue;
        };
        match categories.iter_mut().find(|c| c.name == schema.category) {
            Some(category) => category.block_types.push(kind.type_id()),
            None => categories.push(ToolboxCategory {
                name: schema.category,
                colour: category_colour(schema.category),
                block_types: vec![kind.type_id()],
            }),
        }
    }
    categories
}

pub fn toolbox_xml(registry: &Registry) -> Result<String> {
    let mut root = Element::new("xml");
    root.attributes.insert(
        "xmlns".to_string(),
        "https://developers.google.com/blockly/xml".to_string(),
    );
    root.attributes.insert("id".to_string(), "toolbox".to_string());
    root.attributes
        .insert("style".to_string(), "display: none".to_string());

    for category in toolbox_categories(registry) {
        let mut category_el = Element::new("category");
        category_el
            .attributes
            .insert("name".to_string(), category.name.to_string());
        category_el
            .attributes
            .insert("colour".to_string(), category.colour.to_string());
        for type_id in category.block_types {
            let mut block_el = Element::new("block");
            block_el
                .attributes
                .insert("type".to_string(), type_id.to_string());
            category_el.children.push(XMLNode::Element(block_el));
        }
        root.children.push(XMLNode::Element(category_el));
    }

    let mut out = Vec::new();
    root.write_with_config(
        &mut out,
        EmitterConfig::new().write_document_declaration(false),
    )
    .context("Failed to serialize toolbox XML.")?;
    String::from_utf8(out).context("Toolbox XML was not valid UTF-8.")
}
