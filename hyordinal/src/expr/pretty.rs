//! RcDoc-based pretty-printer with termcolor annotations for [`Expression`].
//!
//! Role
//! - Convert an [`Expression`] into an annotated document. The layout never introduces
//!   whitespace, so the plain rendering is exactly the textual syntax accepted by
//!   [`parse`](crate::parser::parse).
//! - Colors are only emitted through [`PrettyExpr::pretty_print`] and
//!   [`PrettyExpr::pretty_render_to`]; [`stringify`] and `Display` are plain.
//! - Tokens are produced over an explicit stack and `Display` streams them straight to the
//!   formatter. The document concatenates them pairwise, so its depth is logarithmic in the
//!   size of the value rather than proportional to its nesting.
//!
//! Parenthesization
//! - A sum used as a product factor: `(omega+1)*omega`.
//! - A sum, product or power used as a power base: `(omega*2)^omega`.
//! - A sum or product used as an exponent: `omega^(omega+1)`. `^` is right-associative, so
//!   `omega^omega^omega` needs none.
//! - A sum directly inside a sum, or a product directly inside a product. Canonical values are
//!   flat and never print these.

use std::{
    borrow::Cow,
    convert::Infallible,
    io::{self, Write},
};

use pretty::{RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::expr::{ExprNode, ExprType, Expression, OcfVariant, SlotId};

/// Annotation attached to each token of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// `[`, `]`, `{`, `}` and `,`.
    Bracket,
    /// Parenthesis at the given grouping depth.
    Paren(u8),
    /// `Omega`, `BOCF`, `MOCF`, `I`, `Lambda`.
    Constructor,
    /// `+`, `*`, `^`.
    Operator,
    /// `#n`.
    Slot,
    /// Decimal literals.
    Literal,
    /// `omega` and `olo`.
    Constant,
}

const PAREN_PALETTE: [Color; 4] = [Color::Cyan, Color::Yellow, Color::Magenta, Color::Green];

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Style::Bracket => spec.set_dimmed(true),
            Style::Paren(depth) => spec
                .set_fg(Some(PAREN_PALETTE[usize::from(depth) % PAREN_PALETTE.len()]))
                .set_dimmed(true),
            Style::Constructor => spec.set_fg(Some(Color::Blue)).set_bold(true),
            Style::Operator => spec.set_fg(Some(Color::White)).set_bold(true),
            Style::Slot => spec.set_fg(Some(Color::Green)).set_italic(true),
            Style::Literal => spec.set_fg(Some(Color::Magenta)),
            Style::Constant => spec.set_fg(Some(Color::Red)).set_bold(true),
        };
        spec
    }
}

/// Where a child sits relative to its parent, as far as parentheses are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Term,
    Factor,
    Base,
    Exponent,
    Bracketed,
}

#[inline]
fn requires_parens(current: ExprType, position: Position) -> bool {
    use ExprType::*;

    match position {
        Position::Term => current == Plus,
        Position::Factor => matches!(current, Plus | Times),
        Position::Base => matches!(current, Plus | Times | Power),
        Position::Exponent => matches!(current, Plus | Times),
        Position::Bracketed => false,
    }
}

/// One pending piece of output.
enum Item<'e> {
    Node(&'e Expression, Position, u8),
    Token(Style, Cow<'static, str>),
}

fn token<'e>(style: Style, text: &'static str) -> Item<'e> {
    Item::Token(style, Cow::Borrowed(text))
}

fn slot<'e>(id: SlotId) -> Item<'e> {
    Item::Token(Style::Slot, Cow::Owned(id.to_string()))
}

/// Push `parts` separated by commas and wrapped in square brackets.
fn bracketed<'e>(items: &mut Vec<Item<'e>>, parts: impl IntoIterator<Item = Item<'e>>) {
    items.push(token(Style::Bracket, "["));
    separated(items, parts, Style::Bracket, ",");
    items.push(token(Style::Bracket, "]"));
}

fn separated<'e>(
    items: &mut Vec<Item<'e>>,
    parts: impl IntoIterator<Item = Item<'e>>,
    style: Style,
    separator: &'static str,
) {
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            items.push(token(style, separator));
        }
        items.push(part);
    }
}

/// Output of `e` in order, children left unexpanded. `depth` counts the parentheses already
/// open around it.
fn expand<'e>(e: &'e Expression, position: Position, depth: u8, items: &mut Vec<Item<'e>>) {
    let parens = requires_parens(e.type_(), position);
    let inner = if parens {
        items.push(token(Style::Paren(depth), "("));
        depth.wrapping_add(1)
    } else {
        depth
    };
    let child = |c: &'e Expression, position| Item::Node(c, position, inner);

    match e.node() {
        ExprNode::Number(n) => items.push(Item::Token(Style::Literal, Cow::Owned(n.to_string()))),
        ExprNode::Omega => items.push(token(Style::Constant, "omega")),
        ExprNode::OrdinalLabOrdinal => items.push(token(Style::Constant, "olo")),
        ExprNode::Slot(id) => items.push(slot(*id)),
        ExprNode::Plus(terms) => separated(
            items,
            terms.iter().map(|t| child(t, Position::Term)),
            Style::Operator,
            "+",
        ),
        ExprNode::Times(factors) => separated(
            items,
            factors.iter().map(|f| child(f, Position::Factor)),
            Style::Operator,
            "*",
        ),
        ExprNode::Power { base, exponent } => {
            items.push(child(base, Position::Base));
            items.push(token(Style::Operator, "^"));
            items.push(child(exponent, Position::Exponent));
        }
        ExprNode::AdmissibleOmega { subscript } => {
            items.push(token(Style::Constructor, "Omega"));
            bracketed(items, [child(subscript, Position::Bracketed)]);
        }
        ExprNode::InaccessibleOrdinal { args } => {
            items.push(token(Style::Constructor, "I"));
            bracketed(items, args.iter().map(|a| child(a, Position::Bracketed)));
        }
        ExprNode::OrdinalCollapsingFn {
            variant,
            subscript,
            arg,
        } => {
            let head = match variant {
                OcfVariant::B => "BOCF",
                OcfVariant::M => "MOCF",
            };
            items.push(token(Style::Constructor, head));
            bracketed(
                items,
                [
                    child(subscript, Position::Bracketed),
                    child(arg, Position::Bracketed),
                ],
            );
        }
        ExprNode::Lambda {
            args,
            body,
            iterations,
            applied_to,
        } => {
            items.push(token(Style::Constructor, "Lambda"));
            items.push(token(Style::Bracket, "["));
            items.push(token(Style::Bracket, "{"));
            separated(items, args.iter().map(|id| slot(*id)), Style::Bracket, ",");
            items.push(token(Style::Bracket, "}"));
            for c in [body, iterations].into_iter().chain(applied_to.as_ref()) {
                items.push(token(Style::Bracket, ","));
                items.push(child(c, Position::Bracketed));
            }
            items.push(token(Style::Bracket, "]"));
        }
    }

    if parens {
        items.push(token(Style::Paren(depth), ")"));
    }
}

/// Feed the tokens of `root` to `emit`, left to right, over an explicit stack.
fn for_each_token<E>(
    root: &Expression,
    mut emit: impl FnMut(Style, &str) -> Result<(), E>,
) -> Result<(), E> {
    let mut stack = vec![Item::Node(root, Position::Bracketed, 0)];
    let mut expansion = Vec::new();

    while let Some(item) = stack.pop() {
        match item {
            Item::Token(style, text) => emit(style, &text)?,
            Item::Node(e, position, depth) => {
                expand(e, position, depth, &mut expansion);
                stack.extend(expansion.drain(..).rev());
            }
        }
    }
    Ok(())
}

/// Concatenate `docs` pairwise, level by level, so the document is only logarithmically deep.
fn concat_balanced(mut docs: Vec<RcDoc<'static, Style>>) -> RcDoc<'static, Style> {
    while docs.len() > 1 {
        let mut merged = Vec::with_capacity(docs.len().div_ceil(2));
        let mut rest = docs.into_iter();
        while let Some(left) = rest.next() {
            merged.push(match rest.next() {
                Some(right) => left.append(right),
                None => left,
            });
        }
        docs = merged;
    }
    docs.pop().unwrap_or_else(RcDoc::nil)
}

/// Forwards annotations to a termcolor sink as color changes.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

fn render_to<W: WriteColor + Write>(
    doc: &RcDoc<'_, Style>,
    width: usize,
    out: &mut W,
) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

/// Width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for [`Expression`].
pub trait PrettyExpr {
    /// Build an RcDoc representation of this expression with style annotations.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render this expression with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()>;

    /// Print this expression to stdout with colors (TTY-aware), at the terminal width.
    fn pretty_print(&self) -> io::Result<()>;

    /// Format this expression into a plain string (no colors).
    fn pretty_string(&self) -> String;
}

impl PrettyExpr for Expression {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        let mut docs = Vec::new();
        let collected: Result<(), Infallible> = for_each_token(self, |style, text| {
            docs.push(RcDoc::text(text.to_owned()).annotate(style));
            Ok(())
        });
        match collected {
            Ok(()) => concat_balanced(docs),
            Err(never) => match never {},
        }
    }

    #[inline]
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(terminal_width(), &mut stdout)?;
        writeln!(stdout)
    }

    #[inline]
    fn pretty_string(&self) -> String {
        stringify(self)
    }
}

/// Render `expr` in the textual syntax, without colors.
///
/// ```
/// use hyordinal::expr::{Expression, OcfVariant};
/// use hyordinal::expr::pretty::stringify;
///
/// let e = Expression::ocf(
///     OcfVariant::B,
///     Expression::admissible_omega(Expression::one()),
///     Expression::plus(vec![Expression::omega(), Expression::one()]),
/// );
/// assert_eq!(stringify(&e), "BOCF[Omega[1],omega+1]");
/// ```
pub fn stringify(expr: &Expression) -> String {
    expr.to_string()
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for_each_token(self, |_, text| f.write_str(text))
    }
}
