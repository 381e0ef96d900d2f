use crate::ast::{Block, BlockKind, FieldValue, Precedence, Workspace};
use crate::schema::{BlockSchema, Registry};
use std::error::Error;
use std::fmt::{Display, Formatter};

// Fixed vocabulary of the target contract runtime. Emitted verbatim at
// the top of every generated document; renaming anything here breaks
// every previously generated contract.
pub const RUNTIME_IMPORT: &str = "import { Contract, GlobalState, LocalState, abimethod, uint64, Account, Asset, itxn, Txn, Global, assert } from '@algorandfoundation/algorand-typescript'";

#[derive(Debug, Clone)]
pub enum GenError {
    UnregisteredBlockType { block_id: String, type_id: String },
    MalformedBlock { block_id: String, detail: String },
}

impl GenError {
    pub fn block_id(&self) -> &str {
        match self {
            GenError::UnregisteredBlockType { block_id, .. }
            | GenError::MalformedBlock { block_id, .. } => block_id,
        }
    }
}

impl Display for GenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::UnregisteredBlockType { block_id, type_id } => write!(
                f,
                "Block '{}' uses unregistered block type '{}'.",
                block_id, type_id
            ),
            GenError::MalformedBlock { block_id, detail } => {
                write!(f, "Malformed block '{}': {}.", block_id, detail)
            }
        }
    }
}

impl Error for GenError {}

#[derive(Debug, Clone)]
pub enum Emitted {
    Statement(String),
    Value(String, Precedence),
}

pub struct Generator<'a> {
    registry: &'a Registry,
}

impl<'a> Generator<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    // One full pass over the snapshot. Top-level statement blocks emit in
    // snapshot order; loose value blocks on the canvas are not part of
    // the program and are skipped.
    pub fn generate_document(&self, workspace: &Workspace) -> Result<String, GenError> {
        let mut document = String::new();
        for block in &workspace.roots {
            if let Emitted::Statement(text) = self.emit_block(block)? {
                document.push_str(&text);
            }
        }
        Ok(document)
    }

    pub fn emit_block(&self, block: &Block) -> Result<Emitted, GenError> {
        let schema = self.registry.schema(block.kind).ok_or_else(|| {
            GenError::UnregisteredBlockType {
                block_id: block.id.clone(),
                type_id: block.kind.type_id().to_string(),
            }
        })?;
        let emitted = match block.kind {
            BlockKind::ContractClass => {
                let name = self.field_text(block, schema, "NAME")?;
                let body = self.statement_code(block, schema, "BODY")?;
                Emitted::Statement(format!(
                    "{}\n\nexport class {} extends Contract {{\n{}}}\n",
                    RUNTIME_IMPORT, name, body
                ))
            }
            BlockKind::CreateApplication => {
                let body = self.statement_code(block, schema, "BODY")?;
                Emitted::Statement(format!(
                    "  @abimethod()\n  createApplication(): void {{\n{}  }}\n\n",
                    body
                ))
            }
            BlockKind::AbiMethod => {
                let name = self.field_text(block, schema, "NAME")?;
                let params = self.value_code(block, schema, "PARAMS", Precedence::Atomic)?;
                let body = self.statement_code(block, schema, "BODY")?;
                Emitted::Statement(format!(
                    "  @abimethod()\n  {}({}): void {{\n{}  }}\n\n",
                    name, params, body
                ))
            }
            BlockKind::GlobalState => {
                let name = self.field_text(block, schema, "NAME")?;
                let type_name = self.field_text(block, schema, "TYPE")?;
                Emitted::Statement(format!("  {} = GlobalState<{}>()\n", name, type_name))
            }
            BlockKind::LocalState => {
                let name = self.field_text(block, schema, "NAME")?;
                let type_name = self.field_text(block, schema, "TYPE")?;
                Emitted::Statement(format!("  {} = LocalState<{}>()\n", name, type_name))
            }
            BlockKind::StateValue => {
                let state = self.field_text(block, schema, "STATE")?;
                Emitted::Value(format!("this.{}.value", state), Precedence::Member)
            }
            BlockKind::SetStateValue => {
                let state = self.field_text(block, schema, "STATE")?;
                let value = self.value_code(block, schema, "VALUE", Precedence::Atomic)?;
                Emitted::Statement(format!("    this.{}.value = {}\n", state, value))
            }
            BlockKind::ItxnPayment => {
                let receiver = self.value_code(block, schema, "RECEIVER", Precedence::Atomic)?;
                let amount = self.value_code(block, schema, "AMOUNT", Precedence::Atomic)?;
                Emitted::Statement(format!(
                    "    itxn.payment({{\n      receiver: {},\n      amount: {}\n    }}).submit()\n",
                    receiver, amount
                ))
            }
            BlockKind::ItxnAssetTransfer => {
                let receiver = self.value_code(block, schema, "RECEIVER", Precedence::Atomic)?;
                let asset = self.value_code(block, schema, "ASSET", Precedence::Atomic)?;
                let amount = self.value_code(block, schema, "AMOUNT", Precedence::Atomic)?;
                Emitted::Statement(format!(
                    "    itxn.assetTransfer({{\n      assetReceiver: {},\n      xferAsset: {},\n      assetAmount: {}\n    }}).submit()\n",
                    receiver, asset, amount
                ))
            }
            BlockKind::Assert => {
                let condition = self.value_code(block, schema, "CONDITION", Precedence::Atomic)?;
                Emitted::Statement(format!("    assert({})\n", condition))
            }
            BlockKind::Comparison => {
                let left = self.value_code(block, schema, "A", Precedence::Relational)?;
                let op = self.field_text(block, schema, "OP")?;
                let right = self.value_code(block, schema, "B", Precedence::Relational)?;
                Emitted::Value(
                    format!("{} {} {}", left, op, right),
                    Precedence::Relational,
                )
            }
            BlockKind::GlobalCurrentAppAddress => Emitted::Value(
                "Global.currentApplicationAddress".to_string(),
                Precedence::Member,
            ),
            BlockKind::GlobalLatestTimestamp => {
                Emitted::Value("Global.latestTimestamp".to_string(), Precedence::Member)
            }
            BlockKind::TxnSender => {
                Emitted::Value("Txn.sender".to_string(), Precedence::Member)
            }
            BlockKind::TextValue => {
                let text = self.field_text(block, schema, "TEXT")?;
                Emitted::Value(quote_str(&text), Precedence::Atomic)
            }
            BlockKind::NumberValue => {
                let num = self.field_text(block, schema, "NUM")?;
                Emitted::Value(num, Precedence::Atomic)
            }
            BlockKind::ParamDef => {
                let name = self.field_text(block, schema, "NAME")?;
                let type_name = self.field_text(block, schema, "TYPE")?;
                let rest = self.value_code(block, schema, "NEXT", Precedence::Atomic)?;
                let text = if rest.is_empty() {
                    format!("{}: {}", name, type_name)
                } else {
                    format!("{}: {}, {}", name, type_name, rest)
                };
                Emitted::Value(text, Precedence::Atomic)
            }
            BlockKind::ConstDeclaration => {
                let name = self.field_text(block, schema, "NAME")?;
                let value = self.value_code(block, schema, "VALUE", Precedence::Atomic)?;
                Emitted::Statement(format!("    const {} = {}\n", name, value))
            }
            BlockKind::MathOperation => {
                let left = self.value_code(block, schema, "A", Precedence::Atomic)?;
                let op = self.field_text(block, schema, "OP")?;
                let right = self.value_code(block, schema, "B", Precedence::Atomic)?;
                Emitted::Value(format!("{} {} {}", left, op, right), Precedence::Atomic)
            }
        };
        Ok(emitted)
    }

    fn statement_code(
        &self,
        block: &Block,
        schema: &BlockSchema,
        slot: &str,
    ) -> Result<String, GenError> {
        if !schema.has_statement_slot(slot) {
            return Err(GenError::MalformedBlock {
                block_id: block.id.clone(),
                detail: format!("schema does not declare statement slot '{}'", slot),
            });
        }
        let mut code = String::new();
        for child in block.statement_chain(slot) {
            match self.emit_block(child)? {
                Emitted::Statement(text) => code.push_str(&text),
                Emitted::Value(..) => {
                    return Err(GenError::MalformedBlock {
                        block_id: child.id.clone(),
                        detail: "value-producing block connected as a statement".to_string(),
                    });
                }
            }
        }
        Ok(code)
    }

    // The one place fallback substitution and parenthesization happen.
    // An absent child yields the slot's declared fallback at Atomic rank;
    // a present child is parenthesized only when its published rank binds
    // more loosely than the slot's required minimum.
    fn value_code(
        &self,
        block: &Block,
        schema: &BlockSchema,
        slot: &str,
        min: Precedence,
    ) -> Result<String, GenError> {
        let spec = schema.value_slot(slot).ok_or_else(|| GenError::MalformedBlock {
            block_id: block.id.clone(),
            detail: format!("schema does not declare value slot '{}'", slot),
        })?;
        let Some(child) = block.value_child(slot) else {
            return Ok(spec.fallback.to_string());
        };
        match self.emit_block(child)? {
            Emitted::Value(text, rank) => {
                if needs_parens(rank, min) {
                    Ok(format!("({})", text))
                } else {
                    Ok(text)
                }
            }
            Emitted::Statement(_) => Err(GenError::MalformedBlock {
                block_id: child.id.clone(),
                detail: format!("statement block connected to value slot '{}'", slot),
            }),
        }
    }

    fn field_text(
        &self,
        block: &Block,
        schema: &BlockSchema,
        name: &str,
    ) -> Result<String, GenError> {
        if !schema.has_field(name) {
            return Err(GenError::MalformedBlock {
                block_id: block.id.clone(),
                detail: format!("schema does not declare field '{}'", name),
            });
        }
        let value = block.field(name).ok_or_else(|| GenError::MalformedBlock {
            block_id: block.id.clone(),
            detail: format!("missing field '{}'", name),
        })?;
        Ok(match value {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(num) => format_num(*num),
        })
    }
}

fn needs_parens(rank: Precedence, min: Precedence) -> bool {
    rank < min
}

fn quote_str(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn format_num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{:.6}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
