use winnow::ascii::{dec_int, till_line_ending};
use winnow::combinator::{alt, cut_err, delimited, eof, not, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{CompareOp, Value};

/// Untyped syntax tree of a rule expression. Lowered to a
/// [`Check`](crate::Check) once the predicate name is known.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Node {
    Ident(String),
    Literal(Value),
    Op(CompareOp),
    List(Vec<Node>),
    Call { name: String, args: Vec<Arg> },
    Infix {
        column: String,
        op: CompareOp,
        rhs: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Arg {
    pub(super) key: Option<String>,
    pub(super) node: Node,
}

/// A rule definition in DSL text, with the byte offset of its `rule`
/// keyword counted from the end of the input.
#[derive(Debug)]
pub(super) struct RuleDef {
    pub(super) remaining: usize,
    pub(super) name: String,
    pub(super) description: Option<String>,
    pub(super) body: Node,
}

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn negative_number(input: &mut &str) -> ModalResult<Value> {
    let neg_str = (
        '-',
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.'),
    )
        .take()
        .parse_next(input)?;
    if neg_str.contains('.') {
        let f: f64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Int(i))
    }
}

fn float_literal(input: &mut &str) -> ModalResult<f64> {
    // Only match floats that contain a decimal point
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        '.',
        take_while(1.., |c: char| c.is_ascii_digit()),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn literal(input: &mut &str) -> ModalResult<Value> {
    alt((
        string_literal.map(Value::String),
        negative_number,
        float_literal.map(Value::Float),
        dec_int::<_, i64, _>.map(Value::Int),
    ))
    .parse_next(input)
}

// -- Comparison operators ---------------------------------------------------

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt((
        ">=".value(CompareOp::Gte),
        ">".value(CompareOp::Gt),
        "<=".value(CompareOp::Lte),
        "<".value(CompareOp::Lt),
        "==".value(CompareOp::Eq),
        "!=".value(CompareOp::Neq),
    ))
    .parse_next(input)
}

// -- Expressions ------------------------------------------------------------

fn list(input: &mut &str) -> ModalResult<Node> {
    delimited(
        '[',
        separated(0.., node, (ws, ',')),
        (ws, cut_err(']')),
    )
    .map(Node::List)
    .parse_next(input)
}

fn argument(input: &mut &str) -> ModalResult<Arg> {
    ws.parse_next(input)?;
    let key = opt((ident, ws, '=', not('=')).map(|(k, ..)| k.to_owned())).parse_next(input)?;
    let node = if key.is_some() {
        cut_err(node).parse_next(input)?
    } else {
        node.parse_next(input)?
    };
    Ok(Arg { key, node })
}

fn call_args(input: &mut &str) -> ModalResult<Vec<Arg>> {
    delimited(
        '(',
        separated(0.., argument, (ws, ',')),
        (ws, cut_err(')')),
    )
    .parse_next(input)
}

/// An identifier followed by a call, an infix comparison, or nothing.
fn named(input: &mut &str) -> ModalResult<Node> {
    let name = ident.parse_next(input)?;
    match name {
        "true" => return Ok(Node::Literal(Value::Bool(true))),
        "false" => return Ok(Node::Literal(Value::Bool(false))),
        _ => {}
    }

    let checkpoint = input.checkpoint();
    ws.parse_next(input)?;
    if input.starts_with('(') {
        let args = call_args.parse_next(input)?;
        return Ok(Node::Call {
            name: name.to_owned(),
            args,
        });
    }
    if let Some(op) = opt(compare_op).parse_next(input)? {
        let rhs = cut_err(operand)
            .context(StrContext::Expected(StrContextValue::Description(
                "column or value",
            )))
            .parse_next(input)?;
        return Ok(Node::Infix {
            column: name.to_owned(),
            op,
            rhs: Box::new(rhs),
        });
    }
    input.reset(&checkpoint);
    Ok(Node::Ident(name.to_owned()))
}

/// Right-hand side of an infix comparison: no nested comparisons.
fn operand(input: &mut &str) -> ModalResult<Node> {
    ws.parse_next(input)?;
    alt((
        literal.map(Node::Literal),
        (ident, opt(preceded(ws, call_args))).map(|(name, args)| match (name, args) {
            ("true", None) => Node::Literal(Value::Bool(true)),
            ("false", None) => Node::Literal(Value::Bool(false)),
            (name, None) => Node::Ident(name.to_owned()),
            (name, Some(args)) => Node::Call {
                name: name.to_owned(),
                args,
            },
        }),
    ))
    .parse_next(input)
}

pub(super) fn node(input: &mut &str) -> ModalResult<Node> {
    ws.parse_next(input)?;
    alt((
        list,
        literal.map(Node::Literal),
        compare_op.map(Node::Op),
        named,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

/// A single rule expression spanning the whole input.
pub(super) fn expression(input: &mut &str) -> ModalResult<Node> {
    let body = node.parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(eof)
        .context(StrContext::Expected(StrContextValue::Description(
            "end of expression",
        )))
        .parse_next(input)?;
    Ok(body)
}

// -- Rule definitions -------------------------------------------------------

fn rule_def(input: &mut &str) -> ModalResult<RuleDef> {
    ws.parse_next(input)?;
    let remaining = input.len();
    "rule".parse_next(input)?;
    not(any.verify(|c: &char| c.is_ascii_alphanumeric() || *c == '_')).parse_next(input)?;
    ws.parse_next(input)?;

    let name = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "rule name",
        )))
        .parse_next(input)?;

    ws.parse_next(input)?;
    let description = opt(string_literal).parse_next(input)?;

    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let body = cut_err(node)
        .context(StrContext::Expected(StrContextValue::Description(
            "rule body",
        )))
        .parse_next(input)?;

    Ok(RuleDef {
        remaining,
        name: name.to_owned(),
        description,
        body,
    })
}

// -- Top-level parser -------------------------------------------------------

pub(super) fn rule_defs(input: &mut &str) -> ModalResult<Vec<RuleDef>> {
    let defs: Vec<RuleDef> = repeat(0.., rule_def).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(eof)
        .context(StrContext::Expected(StrContextValue::Description(
            "rule definition",
        )))
        .parse_next(input)?;
    Ok(defs)
}
