//! Renders a replay unit as readable Rust-like source
//!
//! This is a human-facing view for inspection and review; the persisted
//! artifact stays the instruction list.

use crate::contract::Value;

use super::program::{Operand, ReplayMethod, ReplayOp, ReplayUnit};

pub fn render(unit: &ReplayUnit) -> String {
    let mut out = String::new();
    out.push_str(&format!("// unit {} (service {})\n", unit.name, unit.service));
    for method in &unit.methods {
        render_method(&mut out, method);
    }
    out
}

fn render_method(out: &mut String, method: &ReplayMethod) {
    out.push_str(&format!("fn {}(ctx: &mut RuntimeContext) {{\n", method.name));
    let mut vars: Vec<String> = Vec::new();
    for op in &method.ops {
        match op {
            ReplayOp::Construct { slot, contract } => {
                let var = format!("{}{}", snake_case(contract), slot);
                if vars.len() <= *slot {
                    vars.resize(slot + 1, String::new());
                }
                vars[*slot] = var.clone();
                out.push_str(&format!("    let {var} = {contract}::default();\n"));
            }
            ReplayOp::Invoke {
                slot,
                method,
                args,
                bind,
            } => {
                let receiver = vars
                    .get(*slot)
                    .filter(|v| !v.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("slot{slot}"));
                let rendered: Vec<String> = args.iter().map(render_operand).collect();
                let invocation = format!("{}.{}({})", receiver, method, rendered.join(", "));
                match bind {
                    Some(key) => {
                        out.push_str(&format!("    ctx.bind({key:?}, {invocation});\n"));
                    }
                    None => out.push_str(&format!("    {invocation};\n")),
                }
            }
        }
    }
    out.push_str("}\n");
}

fn render_operand(operand: &Operand) -> String {
    match operand {
        Operand::Literal(Value::Bool(b)) => b.to_string(),
        Operand::Literal(Value::Int(i)) => i.to_string(),
        Operand::Literal(Value::Float(f)) => format!("{f:?}"),
        Operand::Literal(Value::Str(s)) => format!("{s:?}"),
        Operand::Literal(Value::TypeRef(path)) => path.clone(),
        Operand::ContextLookup(key) => format!("ctx.lookup({key:?})"),
        Operand::Context => "ctx".to_string(),
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_unit() -> ReplayUnit {
        ReplayUnit {
            name: "playback.demo.0".to_string(),
            service: "StartupHook".to_string(),
            methods: vec![ReplayMethod {
                name: "startup".to_string(),
                ops: vec![
                    ReplayOp::Construct {
                        slot: 0,
                        contract: "PoolSetup".to_string(),
                    },
                    ReplayOp::Invoke {
                        slot: 0,
                        method: "configure".to_string(),
                        args: vec![
                            Operand::Literal(Value::Str("shared-cache".to_string())),
                            Operand::ContextLookup("pool-size".to_string()),
                        ],
                        bind: None,
                    },
                    ReplayOp::Invoke {
                        slot: 0,
                        method: "level".to_string(),
                        args: vec![],
                        bind: Some("gauge-level".to_string()),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("PoolSetup"), "pool_setup");
        assert_eq!(snake_case("Setup"), "setup");
        assert_eq!(snake_case("already_lower"), "already_lower");
    }

    #[test]
    fn test_render_sample() {
        insta::assert_snapshot!(sample_unit().render_source().trim_end(), @r#"
        // unit playback.demo.0 (service StartupHook)
        fn startup(ctx: &mut RuntimeContext) {
            let pool_setup0 = PoolSetup::default();
            pool_setup0.configure("shared-cache", ctx.lookup("pool-size"));
            ctx.bind("gauge-level", pool_setup0.level());
        }
        "#);
    }

    #[test]
    fn test_render_operands() {
        assert_eq!(render_operand(&Operand::Literal(Value::Bool(true))), "true");
        assert_eq!(render_operand(&Operand::Literal(Value::Int(4))), "4");
        assert_eq!(render_operand(&Operand::Literal(Value::Float(4.0))), "4.0");
        assert_eq!(
            render_operand(&Operand::Literal(Value::Str("pool".to_string()))),
            "\"pool\""
        );
        assert_eq!(
            render_operand(&Operand::Literal(Value::type_ref("pg::Driver"))),
            "pg::Driver"
        );
        assert_eq!(render_operand(&Operand::Context), "ctx");
    }
}
