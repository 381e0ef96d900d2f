use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    ContractClass,
    CreateApplication,
    AbiMethod,
    GlobalState,
    LocalState,
    StateValue,
    SetStateValue,
    ItxnPayment,
    ItxnAssetTransfer,
    Assert,
    Comparison,
    GlobalCurrentAppAddress,
    GlobalLatestTimestamp,
    TxnSender,
    TextValue,
    NumberValue,
    ParamDef,
    ConstDeclaration,
    MathOperation,
}

impl BlockKind {
    pub const ALL: [BlockKind; 19] = [
        BlockKind::ContractClass,
        BlockKind::CreateApplication,
        BlockKind::AbiMethod,
        BlockKind::GlobalState,
        BlockKind::LocalState,
        BlockKind::StateValue,
        BlockKind::SetStateValue,
        BlockKind::ItxnPayment,
        BlockKind::ItxnAssetTransfer,
        BlockKind::Assert,
        BlockKind::Comparison,
        BlockKind::GlobalCurrentAppAddress,
        BlockKind::GlobalLatestTimestamp,
        BlockKind::TxnSender,
        BlockKind::TextValue,
        BlockKind::NumberValue,
        BlockKind::ParamDef,
        BlockKind::ConstDeclaration,
        BlockKind::MathOperation,
    ];

    pub fn type_id(self) -> &'static str {
        match self {
            BlockKind::ContractClass => "contract_class",
            BlockKind::CreateApplication => "create_application",
            BlockKind::AbiMethod => "abimethod",
            BlockKind::GlobalState => "global_state",
            BlockKind::LocalState => "local_state",
            BlockKind::StateValue => "state_value",
            BlockKind::SetStateValue => "set_state_value",
            BlockKind::ItxnPayment => "itxn_payment",
            BlockKind::ItxnAssetTransfer => "itxn_asset_transfer",
            BlockKind::Assert => "assert",
            BlockKind::Comparison => "comparison",
            BlockKind::GlobalCurrentAppAddress => "global_current_app_address",
            BlockKind::GlobalLatestTimestamp => "global_latest_timestamp",
            BlockKind::TxnSender => "txn_sender",
            BlockKind::TextValue => "text_value",
            BlockKind::NumberValue => "number_value",
            BlockKind::ParamDef => "param_def",
            BlockKind::ConstDeclaration => "const_declaration",
            BlockKind::MathOperation => "math_operation",
        }
    }

    pub fn from_type_id(type_id: &str) -> Option<BlockKind> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.type_id() == type_id)
    }
}

// Binding strength, loosest first. Compared only to decide whether a
// nested expression needs parentheses, never evaluated numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Assignment,
    Relational,
    Member,
    Atomic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub fields: HashMap<String, FieldValue>,
    pub statements: HashMap<String, Vec<Block>>,
    pub values: HashMap<String, Block>,
}

impl Block {
    pub fn new(id: String, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            fields: HashMap::new(),
            statements: HashMap::new(),
            values: HashMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn value_child(&self, slot: &str) -> Option<&Block> {
        self.values.get(slot)
    }

    pub fn statement_chain(&self, slot: &str) -> &[Block] {
        self.statements.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub roots: Vec<Block>,
}
