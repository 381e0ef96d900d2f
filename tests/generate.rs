#![recursion_limit = "256"]

use algoblocks_rs_core::schema::Registry;
use algoblocks_rs_core::{generate_source, toolbox};
use serde_json::{json, Value};
use std::collections::HashSet;

const IMPORT_LINE: &str = "import { Contract, GlobalState, LocalState, abimethod, uint64, Account, Asset, itxn, Txn, Global, assert } from '@algorandfoundation/algorand-typescript'";

fn workspace(blocks: Value) -> String {
    json!({ "blocks": { "languageVersion": 0, "blocks": blocks } }).to_string()
}

fn gen(blocks: Value) -> String {
    let registry = Registry::standard();
    generate_source(&workspace(blocks), &registry).expect("generation failed")
}

fn gen_err(blocks: Value) -> String {
    let registry = Registry::standard();
    generate_source(&workspace(blocks), &registry)
        .expect_err("generation should fail")
        .to_string()
}

fn counter_program() -> Value {
    json!([{
        "type": "contract_class", "id": "c1", "fields": {"NAME": "Counter"},
        "inputs": {"BODY": {"block": {
            "type": "global_state", "id": "s1",
            "fields": {"NAME": "counter", "TYPE": "uint64"},
            "next": {"block": {
                "type": "create_application", "id": "m1",
                "inputs": {"BODY": {"block": {
                    "type": "set_state_value", "id": "st1", "fields": {"STATE": "counter"},
                    "inputs": {"VALUE": {"block": {
                        "type": "number_value", "id": "n0", "fields": {"NUM": 0}
                    }}}
                }}},
                "next": {"block": {
                    "type": "abimethod", "id": "m2", "fields": {"NAME": "increment"},
                    "inputs": {"BODY": {"block": {
                        "type": "set_state_value", "id": "st2", "fields": {"STATE": "counter"},
                        "inputs": {"VALUE": {"block": {
                            "type": "math_operation", "id": "mo1", "fields": {"OP": "+"},
                            "inputs": {
                                "A": {"block": {
                                    "type": "state_value", "id": "sv1",
                                    "fields": {"STATE": "counter"}
                                }},
                                "B": {"block": {
                                    "type": "number_value", "id": "n1", "fields": {"NUM": 1}
                                }}
                            }
                        }}}
                    }}}
                }}
            }}
        }}}
    }])
}

#[test]
fn empty_workspace_emits_empty_document() {
    assert_eq!(gen(json!([])), "");
}

#[test]
fn global_state_declaration_line() {
    let out = gen(json!([{
        "type": "global_state", "id": "g1",
        "fields": {"NAME": "counter", "TYPE": "uint64"}
    }]));
    assert_eq!(out, "  counter = GlobalState<uint64>()\n");
}

#[test]
fn local_state_declaration_line() {
    let out = gen(json!([{
        "type": "local_state", "id": "l1",
        "fields": {"NAME": "deposits", "TYPE": "Account"}
    }]));
    assert_eq!(out, "  deposits = LocalState<Account>()\n");
}

#[test]
fn class_with_empty_entrypoint_matches_template() {
    let out = gen(json!([{
        "type": "contract_class", "id": "c1", "fields": {"NAME": "Counter"},
        "inputs": {"BODY": {"block": {
            "type": "abimethod", "id": "m1", "fields": {"NAME": "start"}
        }}}
    }]));
    let expected = "import { Contract, GlobalState, LocalState, abimethod, uint64, Account, Asset, itxn, Txn, Global, assert } from '@algorandfoundation/algorand-typescript'\n\nexport class Counter extends Contract {\n  @abimethod()\n  start(): void {\n  }\n\n}\n";
    assert_eq!(out, expected);
}

#[test]
fn counter_contract_end_to_end() {
    let out = gen(counter_program());
    let expected = format!(
        "{}\n\nexport class Counter extends Contract {{\n  counter = GlobalState<uint64>()\n  @abimethod()\n  createApplication(): void {{\n    this.counter.value = 0\n  }}\n\n  @abimethod()\n  increment(): void {{\n    this.counter.value = (this.counter.value) + 1\n  }}\n\n}}\n",
        IMPORT_LINE
    );
    assert_eq!(out, expected);
}

#[test]
fn two_passes_are_byte_identical() {
    assert_eq!(gen(counter_program()), gen(counter_program()));
}

#[test]
fn payment_with_empty_slots_uses_documented_defaults() {
    let out = gen(json!([{ "type": "itxn_payment", "id": "p1" }]));
    assert_eq!(
        out,
        "    itxn.payment({\n      receiver: Txn.sender,\n      amount: 0\n    }).submit()\n"
    );
}

#[test]
fn asset_transfer_with_empty_slots_uses_documented_defaults() {
    let out = gen(json!([{ "type": "itxn_asset_transfer", "id": "t1" }]));
    assert_eq!(
        out,
        "    itxn.assetTransfer({\n      assetReceiver: Txn.sender,\n      xferAsset: Asset(),\n      assetAmount: 0\n    }).submit()\n"
    );
}

#[test]
fn assert_with_empty_condition_falls_back_to_true() {
    let out = gen(json!([{ "type": "assert", "id": "a1" }]));
    assert_eq!(out, "    assert(true)\n");
}

#[test]
fn comparison_with_empty_operands_falls_back_to_zero() {
    let out = gen(json!([{
        "type": "assert", "id": "a1",
        "inputs": {"CONDITION": {"block": {
            "type": "comparison", "id": "cmp1", "fields": {"OP": "=="}
        }}}
    }]));
    assert_eq!(out, "    assert((0 == 0))\n");
}

#[test]
fn comparison_operands_at_or_above_relational_stay_bare() {
    let out = gen(json!([{
        "type": "assert", "id": "a1",
        "inputs": {"CONDITION": {"block": {
            "type": "comparison", "id": "cmp1", "fields": {"OP": "<"},
            "inputs": {
                "A": {"block": {"type": "txn_sender", "id": "ts1"}},
                "B": {"block": {"type": "number_value", "id": "n1", "fields": {"NUM": 5}}}
            }
        }}}
    }]));
    assert_eq!(out, "    assert((Txn.sender < 5))\n");
}

#[test]
fn relational_operand_in_math_slot_is_parenthesized() {
    let out = gen(json!([{
        "type": "const_declaration", "id": "cd1", "fields": {"NAME": "flag"},
        "inputs": {"VALUE": {"block": {
            "type": "math_operation", "id": "mo1", "fields": {"OP": "+"},
            "inputs": {
                "A": {"block": {"type": "comparison", "id": "cmp1", "fields": {"OP": "=="}}},
                "B": {"block": {"type": "number_value", "id": "n1", "fields": {"NUM": 1}}}
            }
        }}}
    }]));
    assert_eq!(out, "    const flag = (0 == 0) + 1\n");
}

#[test]
fn atomic_value_in_assignment_slot_stays_bare() {
    let out = gen(json!([{
        "type": "set_state_value", "id": "st1", "fields": {"STATE": "counter"},
        "inputs": {"VALUE": {"block": {
            "type": "number_value", "id": "n1", "fields": {"NUM": 5}
        }}}
    }]));
    assert_eq!(out, "    this.counter.value = 5\n");
}

#[test]
fn member_accessor_in_atomic_slot_is_parenthesized() {
    let out = gen(json!([{
        "type": "itxn_payment", "id": "p1",
        "inputs": {"RECEIVER": {"block": {
            "type": "global_current_app_address", "id": "ga1"
        }}}
    }]));
    assert_eq!(
        out,
        "    itxn.payment({\n      receiver: (Global.currentApplicationAddress),\n      amount: 0\n    }).submit()\n"
    );
}

#[test]
fn text_literals_escape_embedded_quotes() {
    let out = gen(json!([{
        "type": "const_declaration", "id": "cd1", "fields": {"NAME": "msg"},
        "inputs": {"VALUE": {"block": {
            "type": "text_value", "id": "tv1", "fields": {"TEXT": "say \"hi\""}
        }}}
    }]));
    assert_eq!(out, "    const msg = \"say \\\"hi\\\"\"\n");
}

#[test]
fn method_parameters_join_with_separator() {
    let out = gen(json!([{
        "type": "abimethod", "id": "m1", "fields": {"NAME": "transfer"},
        "inputs": {"PARAMS": {"block": {
            "type": "param_def", "id": "pd1",
            "fields": {"NAME": "recipient", "TYPE": "Account"},
            "inputs": {"NEXT": {"block": {
                "type": "param_def", "id": "pd2",
                "fields": {"NAME": "amount", "TYPE": "uint64"}
            }}}
        }}}
    }]));
    assert_eq!(
        out,
        "  @abimethod()\n  transfer(recipient: Account, amount: uint64): void {\n  }\n\n"
    );
}

#[test]
fn loose_value_blocks_are_not_emitted_as_statements() {
    let out = gen(json!([
        { "type": "number_value", "id": "n1", "fields": {"NUM": 9} },
        { "type": "assert", "id": "a1" }
    ]));
    assert_eq!(out, "    assert(true)\n");
}

#[test]
fn unknown_type_id_aborts_with_block_identity() {
    let err = gen_err(json!([{ "type": "while_loop", "id": "w1" }]));
    assert!(err.contains("while_loop"), "unexpected error: {}", err);
    assert!(err.contains("w1"), "unexpected error: {}", err);
}

#[test]
fn empty_registry_rejects_every_type() {
    let registry = Registry::new();
    let err = generate_source(
        &workspace(json!([{ "type": "assert", "id": "a1" }])),
        &registry,
    )
    .expect_err("generation should fail")
    .to_string();
    assert!(err.contains("unregistered block type"), "unexpected error: {}", err);
}

#[test]
fn undeclared_input_aborts_with_block_identity() {
    let err = gen_err(json!([{
        "type": "global_state", "id": "g1",
        "fields": {"NAME": "x", "TYPE": "uint64"},
        "inputs": {"BODY": {"block": {"type": "assert", "id": "a1"}}}
    }]));
    assert!(err.contains("Malformed block 'g1'"), "unexpected error: {}", err);
    assert!(err.contains("BODY"), "unexpected error: {}", err);
}

#[test]
fn missing_field_aborts_with_block_identity() {
    let err = gen_err(json!([{ "type": "contract_class", "id": "c1" }]));
    assert!(err.contains("Malformed block 'c1'"), "unexpected error: {}", err);
    assert!(err.contains("missing field 'NAME'"), "unexpected error: {}", err);
}

#[test]
fn value_block_in_statement_position_aborts() {
    let err = gen_err(json!([{
        "type": "contract_class", "id": "c1", "fields": {"NAME": "C"},
        "inputs": {"BODY": {"block": {
            "type": "number_value", "id": "n1", "fields": {"NUM": 1}
        }}}
    }]));
    assert!(err.contains("Malformed block 'n1'"), "unexpected error: {}", err);
}

#[test]
fn xml_snapshot_generates_the_same_document_as_json() {
    let registry = Registry::standard();
    let xml = r#"<xml xmlns="https://developers.google.com/blockly/xml">
  <block type="contract_class" id="c1">
    <field name="NAME">Vault</field>
    <statement name="BODY">
      <block type="global_state" id="s1">
        <field name="NAME">total</field>
        <field name="TYPE">uint64</field>
        <next>
          <block type="create_application" id="m1">
            <statement name="BODY">
              <block type="itxn_payment" id="p1">
                <value name="AMOUNT">
                  <block type="number_value" id="n1">
                    <field name="NUM">7</field>
                  </block>
                </value>
              </block>
            </statement>
          </block>
        </next>
      </block>
    </statement>
  </block>
</xml>"#;
    let from_xml = generate_source(xml, &registry).expect("xml generation failed");

    let json_blocks = json!([{
        "type": "contract_class", "id": "c1", "fields": {"NAME": "Vault"},
        "inputs": {"BODY": {"block": {
            "type": "global_state", "id": "s1",
            "fields": {"NAME": "total", "TYPE": "uint64"},
            "next": {"block": {
                "type": "create_application", "id": "m1",
                "inputs": {"BODY": {"block": {
                    "type": "itxn_payment", "id": "p1",
                    "inputs": {"AMOUNT": {"block": {
                        "type": "number_value", "id": "n1", "fields": {"NUM": 7}
                    }}}
                }}}
            }}
        }}}
    }]);
    assert_eq!(from_xml, gen(json_blocks));
}

#[test]
fn toolbox_offers_exactly_the_registered_kinds() {
    let registry = Registry::standard();
    let categories = toolbox::toolbox_categories(&registry);
    let offered: HashSet<&str> = categories
        .iter()
        .flat_map(|c| c.block_types.iter().copied())
        .collect();
    let registered: HashSet<&str> = registry.kinds().map(|k| k.type_id()).collect();
    assert_eq!(offered, registered);

    let offered_count: usize = categories.iter().map(|c| c.block_types.len()).sum();
    assert_eq!(offered_count, registered.len(), "palette repeats a block type");
}

#[test]
fn cli_writes_generated_source_and_toolbox() {
    use algoblocks_rs_core::cli::Args;

    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("workspace.json");
    std::fs::write(&input, workspace(counter_program())).expect("write workspace");
    let output = dir.path().join("contract.ts");
    let toolbox_path = dir.path().join("toolbox.xml");

    let args = Args {
        input: Some(input),
        output: Some(output.clone()),
        emit_toolbox: Some(toolbox_path.clone()),
    };
    algoblocks_rs_core::run_cli(&args).expect("run_cli failed");

    let document = std::fs::read_to_string(&output).expect("read output");
    assert!(document.contains("export class Counter extends Contract {"));
    let xml = std::fs::read_to_string(&toolbox_path).expect("read toolbox");
    assert!(xml.contains("<category"));
}
