use crate::ast::{Block, FieldValue, Workspace};
use crate::codegen::GenError;
use crate::schema::{BlockSchema, Registry};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::io::Cursor;
use xmltree::{Element, XMLNode};

// Reads the editing surface's workspace snapshot into a block tree.
// Both serializations the surface produces are accepted: the JSON shape
// ({"blocks": {"blocks": [...]}} with "inputs"/"next" links) and the
// workspace XML shape (<block><field/><value/><statement/><next/>).

pub fn parse_workspace(source: &str, registry: &Registry) -> Result<Workspace> {
    if source.trim_start().starts_with('<') {
        parse_workspace_xml(source, registry)
    } else {
        parse_workspace_json(source, registry)
    }
}

pub fn parse_workspace_json(source: &str, registry: &Registry) -> Result<Workspace> {
    let root: Value = serde_json::from_str(source).context("Invalid workspace JSON.")?;
    let top_blocks = if let Some(arr) = root.as_array() {
        arr
    } else {
        root.get("blocks")
            .and_then(|b| b.get("blocks"))
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("Workspace JSON is missing the 'blocks.blocks' array."))?
    };

    let mut reader = WorkspaceReader::new(registry);
    let mut roots = Vec::new();
    for top in top_blocks {
        reader.read_chain_json(top, &mut roots)?;
    }
    Ok(Workspace { roots })
}

pub fn parse_workspace_xml(source: &str, registry: &Registry) -> Result<Workspace> {
    let root = Element::parse(Cursor::new(source.as_bytes()))
        .map_err(|e| anyhow!("Invalid workspace XML: {}.", e))?;
    if root.name != "xml" {
        bail!(
            "Workspace XML root element must be <xml>, found <{}>.",
            root.name
        );
    }

    let mut reader = WorkspaceReader::new(registry);
    let mut roots = Vec::new();
    for node in &root.children {
        if let XMLNode::Element(el) = node {
            if el.name == "block" || el.name == "shadow" {
                reader.read_chain_xml(el, &mut roots)?;
            }
            // <variables> and other surface bookkeeping carry no program.
        }
    }
    Ok(Workspace { roots })
}

struct WorkspaceReader<'a> {
    registry: &'a Registry,
    auto_id: usize,
}

impl<'a> WorkspaceReader<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            auto_id: 0,
        }
    }

    fn fresh_id(&mut self, type_id: &str) -> String {
        self.auto_id += 1;
        format!("{}_{}", type_id, self.auto_id)
    }

    fn resolve_schema(&self, type_id: &str, id: &str) -> Result<BlockSchema> {
        match self.registry.schema_for_type_id(type_id) {
            Some(schema) => Ok(*schema),
            None => Err(GenError::UnregisteredBlockType {
                block_id: id.to_string(),
                type_id: type_id.to_string(),
            }
            .into()),
        }
    }

    fn read_chain_json(&mut self, first: &Value, out: &mut Vec<Block>) -> Result<()> {
        let mut current = Some(first);
        while let Some(node) = current {
            out.push(self.read_block_json(node)?);
            current = node.get("next").and_then(json_child);
        }
        Ok(())
    }

    fn read_block_json(&mut self, node: &Value) -> Result<Block> {
        let type_id = node
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Workspace block is missing its 'type' tag."))?;
        let id = match node.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => self.fresh_id(type_id),
        };
        let schema = self.resolve_schema(type_id, &id)?;
        let mut block = Block::new(id, schema.kind);

        if let Some(fields) = node.get("fields").and_then(Value::as_object) {
            for (name, value) in fields {
                if !schema.has_field(name) {
                    return Err(malformed(
                        &block.id,
                        format!("schema does not declare field '{}'", name),
                    ));
                }
                let parsed = match value {
                    Value::String(s) => FieldValue::Text(s.clone()),
                    Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or_default()),
                    Value::Bool(b) => FieldValue::Text(b.to_string()),
                    _ => {
                        return Err(malformed(
                            &block.id,
                            format!("field '{}' holds an unsupported value", name),
                        ));
                    }
                };
                block.fields.insert(name.clone(), parsed);
            }
        }

        if let Some(inputs) = node.get("inputs").and_then(Value::as_object) {
            for (name, input) in inputs {
                let Some(child) = json_child(input) else {
                    continue;
                };
                if schema.has_statement_slot(name) {
                    let mut chain = Vec::new();
                    self.read_chain_json(child, &mut chain)?;
                    block.statements.insert(name.clone(), chain);
                } else if schema.value_slot(name).is_some() {
                    let child_block = self.read_block_json(child)?;
                    block.values.insert(name.clone(), child_block);
                } else {
                    return Err(malformed(
                        &block.id,
                        format!("schema does not declare input '{}'", name),
                    ));
                }
            }
        }

        Ok(block)
    }

    fn read_chain_xml(&mut self, first: &Element, out: &mut Vec<Block>) -> Result<()> {
        let mut current = Some(first);
        while let Some(el) = current {
            out.push(self.read_block_xml(el)?);
            current = el.get_child("next").and_then(xml_child);
        }
        Ok(())
    }

    fn read_block_xml(&mut self, el: &Element) -> Result<Block> {
        let type_id = el
            .attributes
            .get("type")
            .ok_or_else(|| anyhow!("Workspace <{}> element is missing 'type'.", el.name))?
            .clone();
        let id = match el.attributes.get("id") {
            Some(id) => id.clone(),
            None => self.fresh_id(&type_id),
        };
        let schema = self.resolve_schema(&type_id, &id)?;
        let mut block = Block::new(id, schema.kind);

        for node in &el.children {
            let XMLNode::Element(child) = node else {
                continue;
            };
            match child.name.as_str() {
                "field" => {
                    let name = named(child, &block.id)?;
                    if !schema.has_field(&name) {
                        return Err(malformed(
                            &block.id,
                            format!("schema does not declare field '{}'", name),
                        ));
                    }
                    let text = child
                        .get_text()
                        .map(|t| t.into_owned())
                        .unwrap_or_default();
                    block.fields.insert(name, FieldValue::Text(text));
                }
                "statement" => {
                    let name = named(child, &block.id)?;
                    if !schema.has_statement_slot(&name) {
                        return Err(malformed(
                            &block.id,
                            format!("schema does not declare statement slot '{}'", name),
                        ));
                    }
                    if let Some(first) = xml_child(child) {
                        let mut chain = Vec::new();
                        self.read_chain_xml(first, &mut chain)?;
                        block.statements.insert(name, chain);
                    }
                }
                "value" => {
                    let name = named(child, &block.id)?;
                    if schema.value_slot(&name).is_none() {
                        return Err(malformed(
                            &block.id,
                            format!("schema does not declare value slot '{}'", name),
                        ));
                    }
                    if let Some(inner) = xml_child(child) {
                        let child_block = self.read_block_xml(inner)?;
                        block.values.insert(name, child_block);
                    }
                }
                // <next> belongs to the chain walker; <mutation> and
                // <comment> are surface-only.
                _ => {}
            }
        }

        Ok(block)
    }
}

fn malformed(block_id: &str, detail: String) -> anyhow::Error {
    GenError::MalformedBlock {
        block_id: block_id.to_string(),
        detail,
    }
    .into()
}

fn named(el: &Element, block_id: &str) -> Result<String> {
    el.attributes
        .get("name")
        .cloned()
        .ok_or_else(|| malformed(block_id, format!("<{}> element is missing 'name'", el.name)))
}

// A connection point holds a real block, or a shadow standing in for one;
// the real block wins when both are present.
fn json_child(input: &Value) -> Option<&Value> {
    input.get("block").or_else(|| input.get("shadow"))
}

fn xml_child(el: &Element) -> Option<&Element> {
    let mut shadow = None;
    for node in &el.children {
        if let XMLNode::Element(child) = node {
            if child.name == "block" {
                return Some(child);
            }
            if child.name == "shadow" && shadow.is_none() {
                shadow = Some(child);
            }
        }
    }
    shadow
}
