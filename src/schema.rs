use crate::ast::BlockKind;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ValueSlotSpec {
    pub name: &'static str,
    pub fallback: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub name: &'static str,
    pub colour: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockSchema {
    pub kind: BlockKind,
    pub category: &'static str,
    pub fields: &'static [FieldSpec],
    pub value_slots: &'static [ValueSlotSpec],
    pub statement_slots: &'static [&'static str],
}

impl BlockSchema {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn value_slot(&self, name: &str) -> Option<&ValueSlotSpec> {
        self.value_slots.iter().find(|s| s.name == name)
    }

    pub fn has_statement_slot(&self, name: &str) -> bool {
        self.statement_slots.iter().any(|s| *s == name)
    }
}

pub const CATEGORIES: &[CategorySpec] = &[
    CategorySpec { name: "Contract", colour: "230" },
    CategorySpec { name: "State", colour: "290" },
    CategorySpec { name: "Transactions", colour: "160" },
    CategorySpec { name: "Logic", colour: "0" },
    CategorySpec { name: "Globals", colour: "290" },
    CategorySpec { name: "Values", colour: "160" },
];

const fn field(name: &'static str) -> FieldSpec {
    FieldSpec { name }
}

const fn value_slot(name: &'static str, fallback: &'static str) -> ValueSlotSpec {
    ValueSlotSpec { name, fallback }
}

// One canonical declaration per block kind; the registry, the emitters,
// and the toolbox all read this table, in this palette order.
pub const STANDARD: &[BlockSchema] = &[
    BlockSchema {
        kind: BlockKind::ContractClass,
        category: "Contract",
        fields: &[field("NAME")],
        value_slots: &[],
        statement_slots: &["BODY"],
    },
    BlockSchema {
        kind: BlockKind::CreateApplication,
        category: "Contract",
        fields: &[],
        value_slots: &[],
        statement_slots: &["BODY"],
    },
    BlockSchema {
        kind: BlockKind::AbiMethod,
        category: "Contract",
        fields: &[field("NAME")],
        value_slots: &[value_slot("PARAMS", "")],
        statement_slots: &["BODY"],
    },
    BlockSchema {
        kind: BlockKind::GlobalState,
        category: "State",
        fields: &[field("NAME"), field("TYPE")],
        value_slots: &[],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::LocalState,
        category: "State",
        fields: &[field("NAME"), field("TYPE")],
        value_slots: &[],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::StateValue,
        category: "State",
        fields: &[field("STATE")],
        value_slots: &[],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::SetStateValue,
        category: "State",
        fields: &[field("STATE")],
        value_slots: &[value_slot("VALUE", "0")],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::ItxnPayment,
        category: "Transactions",
        fields: &[],
        value_slots: &[
            value_slot("RECEIVER", "Txn.sender"),
            value_slot("AMOUNT", "0"),
        ],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::ItxnAssetTransfer,
        category: "Transactions",
        fields: &[],
        value_slots: &[
            value_slot("RECEIVER", "Txn.sender"),
            value_slot("ASSET", "Asset()"),
            value_slot("AMOUNT", "0"),
        ],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::Assert,
        category: "Logic",
        fields: &[],
        value_slots: &[value_slot("CONDITION", "true")],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::Comparison,
        category: "Logic",
        fields: &[field("OP")],
        value_slots: &[value_slot("A", "0"), value_slot("B", "0")],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::GlobalCurrentAppAddress,
        category: "Globals",
        fields: &[],
        value_slots: &[],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::GlobalLatestTimestamp,
        category: "Globals",
        fields: &[],
        value_slots: &[],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::TxnSender,
        category: "Globals",
        fields: &[],
        value_slots: &[],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::TextValue,
        category: "Values",
        fields: &[field("TEXT")],
        value_slots: &[],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::NumberValue,
        category: "Values",
        fields: &[field("NUM")],
        value_slots: &[],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::ParamDef,
        category: "Values",
        fields: &[field("NAME"), field("TYPE")],
        value_slots: &[value_slot("NEXT", "")],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::ConstDeclaration,
        category: "Values",
        fields: &[field("NAME")],
        value_slots: &[value_slot("VALUE", "0")],
        statement_slots: &[],
    },
    BlockSchema {
        kind: BlockKind::MathOperation,
        category: "Values",
        fields: &[field("OP")],
        value_slots: &[value_slot("A", "0"), value_slot("B", "0")],
        statement_slots: &[],
    },
];

#[derive(Debug, Clone)]
pub struct Registry {
    schemas: HashMap<BlockKind, BlockSchema>,
    order: Vec<BlockKind>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn standard() -> Self {
        let mut registry = Registry::new();
        for schema in STANDARD {
            registry.register(*schema);
        }
        registry
    }

    // Adds the schema, or replaces an earlier registration for the same
    // kind while keeping its palette position.
    pub fn register(&mut self, schema: BlockSchema) {
        if self.schemas.insert(schema.kind, schema).is_none() {
            self.order.push(schema.kind);
        }
    }

    pub fn schema(&self, kind: BlockKind) -> Option<&BlockSchema> {
        self.schemas.get(&kind)
    }

    pub fn schema_for_type_id(&self, type_id: &str) -> Option<&BlockSchema> {
        BlockKind::from_type_id(type_id).and_then(|kind| self.schema(kind))
    }

    pub fn kinds(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::standard()
    }
}

pub fn category_colour(name: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.colour)
        .unwrap_or("0")
}
