use chrono::NaiveDate;

use crate::{
    all_complete, all_unique, contains_exactly, in_codelist, in_linear_sequence, is_unique_key,
    not_missing, type_is, Check, CompareOp, Operand, RowCheck, Value, ValueKind,
};

use super::grammar::{Arg, Node};

type Lowered<T> = Result<T, String>;

/// Arguments of one predicate call, split into positional and keyword parts.
struct Args<'a> {
    predicate: &'a str,
    positional: Vec<&'a Node>,
    keywords: Vec<(&'a str, &'a Node)>,
}

impl<'a> Args<'a> {
    fn new(predicate: &'a str, args: &'a [Arg], allowed: &[&str]) -> Lowered<Self> {
        let mut positional = Vec::new();
        let mut keywords: Vec<(&str, &Node)> = Vec::new();
        for arg in args {
            match &arg.key {
                None if !keywords.is_empty() => {
                    return Err(format!(
                        "{predicate}: positional argument after keyword argument"
                    ))
                }
                None => positional.push(&arg.node),
                Some(key) if !allowed.contains(&key.as_str()) => {
                    return Err(format!("{predicate}: unknown argument '{key}'"))
                }
                Some(key) if keywords.iter().any(|(k, _)| *k == key.as_str()) => {
                    return Err(format!("{predicate}: argument '{key}' given twice"))
                }
                Some(key) => keywords.push((key.as_str(), &arg.node)),
            }
        }
        Ok(Self {
            predicate,
            positional,
            keywords,
        })
    }

    fn arity(&self, min: usize, max: usize) -> Lowered<()> {
        let n = self.positional.len();
        if n < min || n > max {
            let expected = if min == max {
                format!("{min}")
            } else if max == usize::MAX {
                format!("at least {min}")
            } else {
                format!("{min} to {max}")
            };
            return Err(format!(
                "{}: expected {expected} argument(s), found {n}",
                self.predicate
            ));
        }
        Ok(())
    }

    fn keyword(&self, key: &str) -> Option<&'a Node> {
        self.keywords
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, node)| *node)
    }

    fn name(&self, i: usize) -> Lowered<String> {
        name(self.predicate, self.positional[i])
    }

    fn value(&self, i: usize) -> Lowered<Value> {
        value(self.predicate, self.positional[i])
    }

    /// All positional arguments as column names; a single list is flattened.
    fn names(&self) -> Lowered<Vec<String>> {
        match self.positional.as_slice() {
            [Node::List(items)] => items.iter().map(|n| name(self.predicate, n)).collect(),
            nodes => nodes.iter().map(|n| name(self.predicate, n)).collect(),
        }
    }

    fn by(&self) -> Lowered<Vec<String>> {
        match self.keyword("by") {
            None => Ok(Vec::new()),
            Some(Node::List(items)) => items.iter().map(|n| name(self.predicate, n)).collect(),
            Some(node) => Ok(vec![name(self.predicate, node)?]),
        }
    }
}

fn name(predicate: &str, node: &Node) -> Lowered<String> {
    match node {
        Node::Ident(name) | Node::Literal(Value::String(name)) => Ok(name.clone()),
        other => Err(format!("{predicate}: expected a name, found {}", describe(other))),
    }
}

fn value(predicate: &str, node: &Node) -> Lowered<Value> {
    match node {
        Node::Literal(v) => Ok(v.clone()),
        Node::Call { name, args } if name == "date" => date(args),
        other => Err(format!("{predicate}: expected a value, found {}", describe(other))),
    }
}

fn date(args: &[Arg]) -> Lowered<Value> {
    match args {
        [Arg {
            key: None,
            node: Node::Literal(Value::String(text)),
        }] => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|e| format!("date: invalid date \"{text}\": {e}")),
        _ => Err("date: expected one \"YYYY-MM-DD\" string".to_owned()),
    }
}

fn operand(predicate: &str, node: &Node) -> Lowered<Operand> {
    match node {
        Node::Ident(column) => Ok(Operand::Column(column.clone())),
        other => value(predicate, other).map(Operand::Literal),
    }
}

fn describe(node: &Node) -> String {
    match node {
        Node::Ident(name) => format!("'{name}'"),
        Node::Literal(v) => v.to_string(),
        Node::Op(op) => format!("operator {op}"),
        Node::List(_) => "a list".to_owned(),
        Node::Call { name, .. } => format!("call to {name}"),
        Node::Infix { .. } => "a comparison".to_owned(),
    }
}

fn kind(node: &Node) -> Lowered<ValueKind> {
    let text = name("typeIs", node)?;
    match text.as_str() {
        "numeric" => Ok(ValueKind::Numeric),
        "text" | "character" => Ok(ValueKind::Text),
        "date" => Ok(ValueKind::Date),
        "logical" => Ok(ValueKind::Logical),
        other => Err(format!(
            "typeIs: unknown kind '{other}' (expected numeric, text, date or logical)"
        )),
    }
}

/// Lower a parsed expression to a check from the fixed vocabulary.
pub(super) fn check(node: &Node) -> Lowered<Check> {
    match node {
        Node::Infix { .. } => row_check(node).map(Check::Row),
        Node::Call { name, args } => call(name, args),
        other => Err(format!(
            "expected a predicate call or comparison, found {}",
            describe(other)
        )),
    }
}

fn row_check(node: &Node) -> Lowered<RowCheck> {
    match node {
        Node::Infix { column, op, rhs } => Ok(RowCheck::Compare {
            column: column.clone(),
            op: *op,
            operand: operand("comparison", rhs)?,
        }),
        Node::Call { name, args } => match call(name, args)? {
            Check::Row(row) => Ok(row),
            _ => Err(format!("{name} cannot be nested in a conditional")),
        },
        other => Err(format!(
            "expected a predicate call or comparison, found {}",
            describe(other)
        )),
    }
}

fn call(predicate: &str, raw: &[Arg]) -> Lowered<Check> {
    let check: Check = match predicate {
        "typeIs" => {
            let args = Args::new(predicate, raw, &[])?;
            args.arity(2, 2)?;
            type_is(&args.name(0)?, kind(args.positional[1])?).into()
        }
        "notMissing" => {
            let args = Args::new(predicate, raw, &[])?;
            args.arity(1, 1)?;
            not_missing(&args.name(0)?).into()
        }
        "allComplete" => {
            let args = Args::new(predicate, raw, &[])?;
            args.arity(1, usize::MAX)?;
            all_complete(args.names()?).into()
        }
        "inRange" => {
            let args = Args::new(predicate, raw, &["strict"])?;
            args.arity(3, 3)?;
            let strict = match args.keyword("strict") {
                None => false,
                Some(Node::Literal(Value::Bool(b))) => *b,
                Some(other) => {
                    return Err(format!(
                        "inRange: strict must be true or false, found {}",
                        describe(other)
                    ))
                }
            };
            RowCheck::InRange {
                column: args.name(0)?,
                min: args.value(1)?,
                max: args.value(2)?,
                strict,
            }
            .into()
        }
        "inCodelist" => {
            let args = Args::new(predicate, raw, &[])?;
            args.arity(2, 2)?;
            in_codelist(&args.name(0)?, &args.name(1)?).into()
        }
        "isUniqueKey" => {
            let args = Args::new(predicate, raw, &["by"])?;
            args.arity(1, usize::MAX)?;
            is_unique_key(args.names()?).by(args.by()?).into()
        }
        "allUnique" => {
            let args = Args::new(predicate, raw, &[])?;
            args.arity(1, usize::MAX)?;
            all_unique(args.names()?).into()
        }
        "inLinearSequence" => {
            let args = Args::new(predicate, raw, &["begin", "end", "by"])?;
            args.arity(1, 3)?;
            let bound = |i: usize, key: &str| -> Lowered<Option<Value>> {
                match (args.positional.get(i).copied(), args.keyword(key)) {
                    (Some(_), Some(_)) => Err(format!(
                        "inLinearSequence: '{key}' given both by position and by name"
                    )),
                    (Some(node), None) | (None, Some(node)) => value(predicate, node).map(Some),
                    (None, None) => Ok(None),
                }
            };
            in_linear_sequence(&args.name(0)?, bound(1, "begin")?, bound(2, "end")?)
                .by(args.by()?)
                .into()
        }
        "containsExactly" => {
            let args = Args::new(predicate, raw, &["by"])?;
            args.arity(1, 1)?;
            contains_exactly(&args.name(0)?).by(args.by()?).into()
        }
        "inequality" => {
            let args = Args::new(predicate, raw, &[])?;
            args.arity(3, 3)?;
            let op: CompareOp = match args.positional[1] {
                Node::Op(op) => *op,
                other => {
                    return Err(format!(
                        "inequality: expected a comparison operator, found {}",
                        describe(other)
                    ))
                }
            };
            RowCheck::Compare {
                column: args.name(0)?,
                op,
                operand: operand(predicate, args.positional[2])?,
            }
            .into()
        }
        "conditional" => {
            let args = Args::new(predicate, raw, &[])?;
            args.arity(3, 3)?;
            RowCheck::Conditional {
                column: args.name(0)?,
                value: args.value(1)?,
                then: Box::new(row_check(args.positional[2])?),
            }
            .into()
        }
        other => return Err(format!("unknown predicate '{other}'")),
    };
    Ok(check)
}
