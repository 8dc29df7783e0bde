use scraper::ElementRef;
use thiserror::Error;

use crate::dom::document::{Document, own_text_nodes, tag_name, text_content};
use crate::dom::normalize::collapse_xml_space;

// ============================================================================
// XPath helper: a read-only XPath 1.0 subset evaluated over a parsed Document
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XPathError {
    #[error("cannot parse XPath '{expr}' at offset {offset}: {message}")]
    Parse {
        expr: String,
        offset: usize,
        message: String,
    },

    #[error("unsupported XPath feature in '{expr}': {feature}")]
    Unsupported { expr: String, feature: String },
}

/// A compiled XPath expression.
///
/// Supports location paths (absolute, relative, `//`, `.`, `..`, unions), the
/// tree-structural axes, element name tests, and predicates built from positions,
/// attributes, comparisons and the common string functions. Results are always
/// element nodes in document order.
#[derive(Debug, Clone)]
pub struct XPath {
    paths: Vec<LocationPath>,
}

impl XPath {
    pub fn parse(expr: &str) -> Result<Self, XPathError> {
        let tokens = tokenize(expr)?;
        let mut parser = Parser {
            expr,
            tokens,
            pos: 0,
        };
        let paths = parser.parse_union()?;
        Ok(Self { paths })
    }

    /// Evaluate relative to `base` (the document node when `None`).
    ///
    /// Returns `None` when no element matches.
    pub fn evaluate<'a>(
        &self,
        doc: &'a Document,
        base: Option<ElementRef<'a>>,
    ) -> Option<Vec<ElementRef<'a>>> {
        let matches = self.select(doc, base);
        if matches.is_empty() { None } else { Some(matches) }
    }

    /// Like [`XPath::evaluate`], with an empty list instead of `None`.
    pub fn select<'a>(&self, doc: &'a Document, base: Option<ElementRef<'a>>) -> Vec<ElementRef<'a>> {
        let context = base.map(XNode::Element).unwrap_or(XNode::Document);

        let elements: Vec<ElementRef<'a>> = self
            .paths
            .iter()
            .flat_map(|path| eval_path(path, doc, context))
            .filter_map(|node| node.element())
            .collect();

        doc.in_document_order(&elements)
    }
}

// ============================================================================
// AST
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    Ancestor,
    AncestorOrSelf,
    SelfAxis,
    PrecedingSibling,
    FollowingSibling,
}

impl Axis {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "child" => Some(Axis::Child),
            "descendant" => Some(Axis::Descendant),
            "descendant-or-self" => Some(Axis::DescendantOrSelf),
            "parent" => Some(Axis::Parent),
            "ancestor" => Some(Axis::Ancestor),
            "ancestor-or-self" => Some(Axis::AncestorOrSelf),
            "self" => Some(Axis::SelfAxis),
            "preceding-sibling" => Some(Axis::PrecedingSibling),
            "following-sibling" => Some(Axis::FollowingSibling),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum NodeTest {
    Name(String),
    AnyElement,
    AnyNode,
}

#[derive(Debug, Clone)]
struct Step {
    axis: Axis,
    test: NodeTest,
    predicates: Vec<Expr>,
}

impl Step {
    fn abbreviated(axis: Axis) -> Self {
        Step {
            axis,
            test: NodeTest::AnyNode,
            predicates: vec![],
        }
    }
}

#[derive(Debug, Clone)]
struct LocationPath {
    absolute: bool,
    steps: Vec<Step>,
}

#[derive(Debug, Clone)]
enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    NotEq(Box<Expr>, Box<Expr>),
    Literal(String),
    Number(f64),
    Attribute(String),
    Function(String, Vec<Expr>),
    Path(LocationPath),
}

/// (name, min args, max args)
const FUNCTIONS: &[(&str, usize, usize)] = &[
    ("text", 0, 0),
    ("normalize-space", 0, 1),
    ("string", 0, 1),
    ("string-length", 0, 1),
    ("contains", 2, 2),
    ("starts-with", 2, 2),
    ("concat", 2, usize::MAX),
    ("not", 1, 1),
    ("count", 1, 1),
    ("last", 0, 0),
    ("position", 0, 0),
    ("name", 0, 0),
    ("local-name", 0, 0),
    ("true", 0, 0),
    ("false", 0, 0),
];

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Slash,
    DoubleSlash,
    LBracket,
    RBracket,
    LParen,
    RParen,
    At,
    Comma,
    Pipe,
    Eq,
    NotEq,
    Dot,
    DotDot,
    AxisSep,
    Star,
    Name(String),
    Literal(String),
    Number(f64),
}

fn tokenize(expr: &str) -> Result<Vec<(Token, usize)>, XPathError> {
    let bytes: Vec<char> = expr.chars().collect();
    let offsets: Vec<usize> = expr.char_indices().map(|(i, _)| i).collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let parse_error = |offset: usize, message: &str| XPathError::Parse {
        expr: expr.to_string(),
        offset,
        message: message.to_string(),
    };

    while i < bytes.len() {
        let c = bytes[i];
        let offset = offsets[i];
        let next = bytes.get(i + 1).copied();

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let (token, width) = match c {
            '/' if next == Some('/') => (Token::DoubleSlash, 2),
            '/' => (Token::Slash, 1),
            '[' => (Token::LBracket, 1),
            ']' => (Token::RBracket, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            '@' => (Token::At, 1),
            ',' => (Token::Comma, 1),
            '|' => (Token::Pipe, 1),
            '=' => (Token::Eq, 1),
            '!' if next == Some('=') => (Token::NotEq, 2),
            ':' if next == Some(':') => (Token::AxisSep, 2),
            '*' => (Token::Star, 1),
            '.' if next == Some('.') => (Token::DotDot, 2),
            '.' if next.is_some_and(|n| n.is_ascii_digit()) => {
                let len = number_len(&bytes[i..]);
                let text: String = bytes[i..i + len].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| parse_error(offset, "malformed number"))?;
                (Token::Number(value), len)
            }
            '.' => (Token::Dot, 1),
            '\'' | '"' => {
                let end = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == c)
                    .ok_or_else(|| parse_error(offset, "unterminated string literal"))?;
                let text: String = bytes[i + 1..i + 1 + end].iter().collect();
                (Token::Literal(text), end + 2)
            }
            d if d.is_ascii_digit() => {
                let len = number_len(&bytes[i..]);
                let text: String = bytes[i..i + len].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| parse_error(offset, "malformed number"))?;
                (Token::Number(value), len)
            }
            n if n.is_alphabetic() || n == '_' => {
                let len = bytes[i..]
                    .iter()
                    .take_while(|&&b| b.is_alphanumeric() || b == '-' || b == '_' || b == '.')
                    .count();
                let text: String = bytes[i..i + len].iter().collect();
                (Token::Name(text), len)
            }
            other => {
                return Err(parse_error(offset, &format!("unexpected character '{}'", other)));
            }
        };

        tokens.push((token, offset));
        i += width;
    }

    Ok(tokens)
}

fn number_len(chars: &[char]) -> usize {
    let mut seen_dot = false;
    chars
        .iter()
        .take_while(|&&c| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                true
            } else {
                c.is_ascii_digit()
            }
        })
        .count()
}

// ============================================================================
// Parser (recursive descent)
// ============================================================================

struct Parser<'e> {
    expr: &'e str,
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        token
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, o)| *o)
            .unwrap_or(self.expr.len())
    }

    fn error(&self, message: &str) -> XPathError {
        XPathError::Parse {
            expr: self.expr.to_string(),
            offset: self.offset(),
            message: message.to_string(),
        }
    }

    fn unsupported(&self, feature: &str) -> XPathError {
        XPathError::Unsupported {
            expr: self.expr.to_string(),
            feature: feature.to_string(),
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), XPathError> {
        if self.peek() == Some(&token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected {}", what)))
        }
    }

    fn parse_union(&mut self) -> Result<Vec<LocationPath>, XPathError> {
        if self.tokens.is_empty() {
            return Err(self.error("empty expression"));
        }

        let mut paths = vec![self.parse_location_path()?];
        while self.peek() == Some(&Token::Pipe) {
            self.pos += 1;
            paths.push(self.parse_location_path()?);
        }

        if self.peek().is_some() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(paths)
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Dot | Token::DotDot | Token::Star | Token::Name(_) | Token::At)
        )
    }

    fn parse_location_path(&mut self) -> Result<LocationPath, XPathError> {
        match self.peek() {
            Some(Token::Slash) => {
                self.pos += 1;
                let steps = if self.starts_step() {
                    self.parse_relative_steps()?
                } else {
                    vec![]
                };
                Ok(LocationPath {
                    absolute: true,
                    steps,
                })
            }
            Some(Token::DoubleSlash) => {
                self.pos += 1;
                let mut steps = vec![Step::abbreviated(Axis::DescendantOrSelf)];
                steps.extend(self.parse_relative_steps()?);
                Ok(LocationPath {
                    absolute: true,
                    steps,
                })
            }
            _ => Ok(LocationPath {
                absolute: false,
                steps: self.parse_relative_steps()?,
            }),
        }
    }

    fn parse_relative_steps(&mut self) -> Result<Vec<Step>, XPathError> {
        let mut steps = vec![self.parse_step()?];
        loop {
            match self.peek() {
                Some(Token::Slash) => {
                    self.pos += 1;
                    steps.push(self.parse_step()?);
                }
                Some(Token::DoubleSlash) => {
                    self.pos += 1;
                    steps.push(Step::abbreviated(Axis::DescendantOrSelf));
                    steps.push(self.parse_step()?);
                }
                _ => return Ok(steps),
            }
        }
    }

    fn parse_step(&mut self) -> Result<Step, XPathError> {
        match self.peek() {
            Some(Token::Dot) => {
                self.pos += 1;
                return Ok(Step::abbreviated(Axis::SelfAxis));
            }
            Some(Token::DotDot) => {
                self.pos += 1;
                return Ok(Step::abbreviated(Axis::Parent));
            }
            Some(Token::At) => return Err(self.unsupported("attribute nodes as results")),
            _ => {}
        }

        let mut axis = Axis::Child;
        if let (Some(Token::Name(name)), Some(Token::AxisSep)) = (self.peek(), self.peek_at(1)) {
            axis = match Axis::from_name(name) {
                Some(a) => a,
                None => return Err(self.unsupported(&format!("axis '{}'", name))),
            };
            self.pos += 2;
        }

        let test = match self.advance() {
            Some(Token::Star) => NodeTest::AnyElement,
            Some(Token::Name(name)) if self.peek() == Some(&Token::LParen) => {
                if name != "node" {
                    return Err(self.unsupported(&format!("node test '{}()'", name)));
                }
                self.pos += 1;
                self.expect(Token::RParen, "')'")?;
                NodeTest::AnyNode
            }
            Some(Token::Name(name)) => NodeTest::Name(name.to_ascii_lowercase()),
            _ => {
                self.pos -= 1;
                return Err(self.error("expected a node test"));
            }
        };

        let mut predicates = Vec::new();
        while self.peek() == Some(&Token::LBracket) {
            self.pos += 1;
            predicates.push(self.parse_or()?);
            self.expect(Token::RBracket, "']'")?;
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Name(n)) if n == keyword)
    }

    fn parse_or(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_and()?;
        while self.peek_keyword("or") {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_equality()?;
        while self.peek_keyword("and") {
            self.pos += 1;
            let right = self.parse_equality()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, XPathError> {
        let left = self.parse_primary()?;
        match self.peek() {
            Some(Token::Eq) => {
                self.pos += 1;
                Ok(Expr::Eq(Box::new(left), Box::new(self.parse_primary()?)))
            }
            Some(Token::NotEq) => {
                self.pos += 1;
                Ok(Expr::NotEq(Box::new(left), Box::new(self.parse_primary()?)))
            }
            _ => Ok(left),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, XPathError> {
        match self.peek().cloned() {
            Some(Token::Literal(s)) => {
                self.pos += 1;
                Ok(Expr::Literal(s))
            }
            Some(Token::Number(n)) => {
                self.pos += 1;
                Ok(Expr::Number(n))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.parse_or()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::At) => {
                self.pos += 1;
                match self.advance() {
                    Some(Token::Name(name)) => Ok(Expr::Attribute(name.to_ascii_lowercase())),
                    Some(Token::Star) => Err(self.unsupported("@*")),
                    _ => {
                        self.pos -= 1;
                        Err(self.error("expected an attribute name"))
                    }
                }
            }
            Some(Token::Name(name))
                if name != "node" && self.peek_at(1) == Some(&Token::LParen) =>
            {
                self.parse_function(name)
            }
            Some(
                Token::Slash
                | Token::DoubleSlash
                | Token::Dot
                | Token::DotDot
                | Token::Star
                | Token::Name(_),
            ) => Ok(Expr::Path(self.parse_location_path()?)),
            _ => Err(self.error("expected an expression")),
        }
    }

    fn parse_function(&mut self, name: String) -> Result<Expr, XPathError> {
        let (min, max) = match FUNCTIONS.iter().find(|(n, _, _)| *n == name) {
            Some((_, min, max)) => (*min, *max),
            None => return Err(self.unsupported(&format!("function '{}()'", name))),
        };

        // name + '('
        self.pos += 2;
        let mut args = Vec::new();
        if self.peek() != Some(&Token::RParen) {
            args.push(self.parse_or()?);
            while self.peek() == Some(&Token::Comma) {
                self.pos += 1;
                args.push(self.parse_or()?);
            }
        }
        self.expect(Token::RParen, "')'")?;

        if args.len() < min || args.len() > max {
            return Err(self.error(&format!(
                "wrong number of arguments for {}(): {}",
                name,
                args.len()
            )));
        }
        Ok(Expr::Function(name, args))
    }
}

// ============================================================================
// Evaluation
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum XNode<'a> {
    Document,
    Element(ElementRef<'a>),
}

impl<'a> XNode<'a> {
    fn element(self) -> Option<ElementRef<'a>> {
        match self {
            XNode::Element(el) => Some(el),
            XNode::Document => None,
        }
    }

    fn string_value(self, doc: &'a Document) -> String {
        match self {
            XNode::Element(el) => text_content(el),
            XNode::Document => text_content(doc.root_element()),
        }
    }
}

/// The raw tree handle an `ElementRef` dereferences to.
type TreeNode<'a> = <ElementRef<'a> as std::ops::Deref>::Target;

/// Only the tree root is not an element, so anything unwrappable is the document node.
fn wrap_node(node: TreeNode<'_>) -> XNode<'_> {
    ElementRef::wrap(node)
        .map(XNode::Element)
        .unwrap_or(XNode::Document)
}

fn axis_nodes<'a>(doc: &'a Document, node: XNode<'a>, axis: Axis) -> Vec<XNode<'a>> {
    let el = match node {
        XNode::Element(el) => el,
        XNode::Document => {
            let root = doc.root_element();
            return match axis {
                Axis::Child => vec![XNode::Element(root)],
                Axis::Descendant => elements(root.descendants()),
                Axis::DescendantOrSelf => {
                    let mut all = vec![XNode::Document];
                    all.extend(elements(root.descendants()));
                    all
                }
                Axis::SelfAxis | Axis::AncestorOrSelf => vec![XNode::Document],
                _ => vec![],
            };
        }
    };

    match axis {
        Axis::Child => elements(el.children()),
        Axis::Descendant => elements(el.descendants().skip(1)),
        Axis::DescendantOrSelf => elements(el.descendants()),
        Axis::Parent => el.parent().map(wrap_node).into_iter().collect(),
        Axis::Ancestor => el.ancestors().map(wrap_node).collect(),
        Axis::AncestorOrSelf => std::iter::once(node)
            .chain(el.ancestors().map(wrap_node))
            .collect(),
        Axis::SelfAxis => vec![node],
        Axis::PrecedingSibling => elements(el.prev_siblings()),
        Axis::FollowingSibling => elements(el.next_siblings()),
    }
}

fn elements<'a>(nodes: impl Iterator<Item = TreeNode<'a>>) -> Vec<XNode<'a>> {
    nodes
        .filter_map(ElementRef::wrap)
        .map(XNode::Element)
        .collect()
}

fn matches_test(node: XNode<'_>, test: &NodeTest) -> bool {
    match (test, node) {
        (NodeTest::AnyNode, _) => true,
        (NodeTest::AnyElement, XNode::Element(_)) => true,
        (NodeTest::Name(name), XNode::Element(el)) => el.value().name().eq_ignore_ascii_case(name),
        _ => false,
    }
}

fn eval_path<'a>(path: &LocationPath, doc: &'a Document, context: XNode<'a>) -> Vec<XNode<'a>> {
    let mut current = vec![if path.absolute { XNode::Document } else { context }];

    for step in &path.steps {
        let mut next = Vec::new();
        for node in &current {
            // Candidates stay in axis order so predicates see proximity positions
            let mut candidates: Vec<XNode<'a>> = axis_nodes(doc, *node, step.axis)
                .into_iter()
                .filter(|n| matches_test(*n, &step.test))
                .collect();

            for predicate in &step.predicates {
                candidates = filter_predicate(doc, candidates, predicate);
            }
            next.extend(candidates);
        }
        current = document_order(doc, next);
    }

    current
}

fn document_order<'a>(doc: &'a Document, nodes: Vec<XNode<'a>>) -> Vec<XNode<'a>> {
    let has_document = nodes.iter().any(|n| matches!(n, XNode::Document));
    let elements: Vec<ElementRef<'a>> = nodes.into_iter().filter_map(XNode::element).collect();

    let mut ordered = Vec::new();
    if has_document {
        ordered.push(XNode::Document);
    }
    ordered.extend(doc.in_document_order(&elements).into_iter().map(XNode::Element));
    ordered
}

fn filter_predicate<'a>(doc: &'a Document, candidates: Vec<XNode<'a>>, predicate: &Expr) -> Vec<XNode<'a>> {
    let size = candidates.len();
    candidates
        .into_iter()
        .enumerate()
        .filter(|(i, node)| {
            let ctx = EvalContext {
                doc,
                node: *node,
                position: i + 1,
                size,
            };
            match eval_expr(predicate, &ctx) {
                Value::Num(n) => n == (i + 1) as f64,
                other => other.to_bool(),
            }
        })
        .map(|(_, node)| node)
        .collect()
}

struct EvalContext<'a> {
    doc: &'a Document,
    node: XNode<'a>,
    position: usize,
    size: usize,
}

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    /// String values of a node-set, in document order.
    Set(Vec<String>),
}

impl Value {
    fn to_bool(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Bool(b) => *b,
            Value::Set(v) => !v.is_empty(),
        }
    }

    fn to_str(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => format_number(*n),
            Value::Bool(b) => b.to_string(),
            Value::Set(v) => v.first().cloned().unwrap_or_default(),
        }
    }

    fn to_num(&self) -> f64 {
        match self {
            Value::Num(n) => *n,
            Value::Bool(b) => f64::from(u8::from(*b)),
            other => str_to_num(&other.to_str()),
        }
    }
}

fn str_to_num(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Set(x), Value::Set(y)) => x.iter().any(|s| y.contains(s)),
        (Value::Set(x), Value::Num(n)) | (Value::Num(n), Value::Set(x)) => {
            x.iter().any(|s| str_to_num(s) == *n)
        }
        (Value::Set(x), Value::Str(s)) | (Value::Str(s), Value::Set(x)) => x.iter().any(|v| v == s),
        (Value::Set(x), Value::Bool(b)) | (Value::Bool(b), Value::Set(x)) => x.is_empty() != *b,
        (Value::Bool(_), _) | (_, Value::Bool(_)) => a.to_bool() == b.to_bool(),
        (Value::Num(_), _) | (_, Value::Num(_)) => a.to_num() == b.to_num(),
        _ => a.to_str() == b.to_str(),
    }
}

fn values_not_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Set(x), Value::Set(y)) => x.iter().any(|s| y.iter().any(|t| s != t)),
        (Value::Set(x), Value::Num(n)) | (Value::Num(n), Value::Set(x)) => {
            x.iter().any(|s| str_to_num(s) != *n)
        }
        (Value::Set(x), Value::Str(s)) | (Value::Str(s), Value::Set(x)) => x.iter().any(|v| v != s),
        _ => !values_equal(a, b),
    }
}

fn eval_expr(expr: &Expr, ctx: &EvalContext<'_>) -> Value {
    match expr {
        Expr::Or(l, r) => Value::Bool(eval_expr(l, ctx).to_bool() || eval_expr(r, ctx).to_bool()),
        Expr::And(l, r) => Value::Bool(eval_expr(l, ctx).to_bool() && eval_expr(r, ctx).to_bool()),
        Expr::Eq(l, r) => Value::Bool(values_equal(&eval_expr(l, ctx), &eval_expr(r, ctx))),
        Expr::NotEq(l, r) => Value::Bool(values_not_equal(&eval_expr(l, ctx), &eval_expr(r, ctx))),
        Expr::Literal(s) => Value::Str(s.clone()),
        Expr::Number(n) => Value::Num(*n),
        Expr::Attribute(name) => Value::Set(
            ctx.node
                .element()
                .and_then(|el| el.value().attr(name))
                .map(|v| vec![v.to_string()])
                .unwrap_or_default(),
        ),
        Expr::Path(path) => Value::Set(
            eval_path(path, ctx.doc, ctx.node)
                .into_iter()
                .map(|n| n.string_value(ctx.doc))
                .collect(),
        ),
        Expr::Function(name, args) => eval_function(name, args, ctx),
    }
}

fn eval_function(name: &str, args: &[Expr], ctx: &EvalContext<'_>) -> Value {
    let arg_str = |i: usize| -> String {
        match args.get(i) {
            Some(arg) => eval_expr(arg, ctx).to_str(),
            None => ctx.node.string_value(ctx.doc),
        }
    };

    match name {
        "text" => Value::Set(ctx.node.element().map(own_text_nodes).unwrap_or_default()),
        "normalize-space" => Value::Str(collapse_xml_space(&arg_str(0))),
        "string" => Value::Str(arg_str(0)),
        "string-length" => Value::Num(arg_str(0).chars().count() as f64),
        "contains" => Value::Bool(arg_str(0).contains(&arg_str(1))),
        "starts-with" => Value::Bool(arg_str(0).starts_with(&arg_str(1))),
        "concat" => Value::Str((0..args.len()).map(arg_str).collect()),
        "not" => Value::Bool(!eval_expr(&args[0], ctx).to_bool()),
        "count" => match eval_expr(&args[0], ctx) {
            Value::Set(v) => Value::Num(v.len() as f64),
            _ => Value::Num(0.0),
        },
        "last" => Value::Num(ctx.size as f64),
        "position" => Value::Num(ctx.position as f64),
        "name" | "local-name" => Value::Str(ctx.node.element().map(tag_name).unwrap_or_default()),
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        // Rejected at parse time
        _ => Value::Bool(false),
    }
}
