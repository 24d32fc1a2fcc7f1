//! Recursive descent parser: BEL tokens → [`Statement`].
//!
//! The parser is hand-rolled (no external parser combinator dependency) for
//! full control over error positions and the BEL 1.0 compatibility forms.
//! It never touches the graph; every namespaced name is checked against the
//! [`NamespaceResolver`] as it is read.

use serde::{Deserialize, Serialize};

use super::ast::{
    ActivityAst, FusionAst, ModIdentifier, Modifier, Statement, SubjectTerm, Term, VariantAst,
};
use super::error::GrammarError;
use super::lexer::{self, Token, TokenKind};
use crate::error::BelResult;
use crate::language::{self, Entity, Function, Relation};
use crate::namespace::NamespaceResolver;

/// `[parser]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum nesting of terms, modifiers and nested statements.
    pub max_depth: usize,
    /// Accept BEL 1.0 forms (`sub`, `trunc`, `kin(...)`, legacy fusions,
    /// one-letter pmod codes).
    pub allow_legacy: bool,
    /// Accept names without a namespace prefix.
    pub allow_naked_names: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            allow_legacy: true,
            allow_naked_names: false,
        }
    }
}

/// Parse one BEL statement.
pub fn parse_statement(
    input: &str,
    resolver: &dyn NamespaceResolver,
    config: &ParserConfig,
) -> BelResult<Statement> {
    let mut parser = Parser::new(input, resolver, config)?;
    let statement = parser.statement()?;
    parser.finish()?;
    Ok(statement)
}

/// Parse a single (optionally modified) term, e.g. for naming a node.
pub fn parse_term(
    input: &str,
    resolver: &dyn NamespaceResolver,
    config: &ParserConfig,
) -> BelResult<SubjectTerm> {
    let mut parser = Parser::new(input, resolver, config)?;
    let term = parser.subject_term()?;
    parser.finish()?;
    Ok(term)
}

/// A name read from the token stream before any validation.
struct RawIdentifier {
    namespace: Option<String>,
    name: String,
    position: usize,
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    input_len: usize,
    resolver: &'a dyn NamespaceResolver,
    config: &'a ParserConfig,
    depth: usize,
    /// Naked names seen so far; reported after the whole statement parses
    /// so structural errors take precedence.
    naked: Vec<(usize, String)>,
}

impl<'a> Parser<'a> {
    pub fn new(
        input: &str,
        resolver: &'a dyn NamespaceResolver,
        config: &'a ParserConfig,
    ) -> BelResult<Self> {
        Ok(Self {
            tokens: lexer::tokenize(input)?,
            pos: 0,
            input_len: input.len(),
            resolver,
            config,
            depth: 0,
            naked: Vec::new(),
        })
    }

    // ── Token helpers ──────────────────────────────────────────────────

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.input_len, |t| t.span.start)
    }

    fn next(&mut self, expected: &str) -> BelResult<Token> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(GrammarError::UnexpectedEnd {
                position: self.input_len,
                expected: expected.to_string(),
            }
            .into()),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> BelResult<Token> {
        let token = self.next(expected)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(&token, expected))
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind(0) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_word(&mut self, expected: &str) -> BelResult<(String, usize)> {
        let token = self.next(expected)?;
        match token.kind {
            TokenKind::Word(w) => Ok((w, token.span.start)),
            _ => Err(unexpected(&token, expected)),
        }
    }

    /// A word or quoted string used as a plain value.
    fn expect_value(&mut self, expected: &str) -> BelResult<(String, usize)> {
        let token = self.next(expected)?;
        match token.kind {
            TokenKind::Word(w) | TokenKind::Quoted(w) => Ok((w, token.span.start)),
            _ => Err(unexpected(&token, expected)),
        }
    }

    /// Whether the next tokens are `keyword (`.
    fn at_call(&self, keywords: &[&str]) -> bool {
        matches!(self.peek_kind(0), Some(TokenKind::Word(w)) if keywords.contains(&w.as_str()))
            && self.peek_kind(1) == Some(&TokenKind::LParen)
    }

    fn enter(&mut self, position: usize) -> BelResult<()> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(GrammarError::NestingTooDeep {
                position,
                max_depth: self.config.max_depth,
            }
            .into());
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn require_legacy(&self, position: usize, fragment: &str) -> BelResult<()> {
        if self.config.allow_legacy {
            Ok(())
        } else {
            Err(GrammarError::LegacyDisabled {
                position,
                fragment: fragment.to_string(),
            }
            .into())
        }
    }

    /// Reject leftover tokens and deferred naked names.
    pub fn finish(&mut self) -> BelResult<()> {
        if let Some(token) = self.peek() {
            return Err(GrammarError::TrailingInput {
                position: token.span.start,
                fragment: token.fragment(),
            }
            .into());
        }
        if let Some((position, name)) = self.naked.first() {
            return Err(GrammarError::NakedName {
                position: *position,
                fragment: name.clone(),
            }
            .into());
        }
        Ok(())
    }

    // ── Statements ─────────────────────────────────────────────────────

    pub fn statement(&mut self) -> BelResult<Statement> {
        let subject = self.subject_term()?;
        if self.peek().is_none() || self.peek_kind(0) == Some(&TokenKind::RParen) {
            return Ok(Statement::Term(subject));
        }

        let (word, position) = self.expect_word("a relation")?;

        if let Some(relation) = Relation::from_list_keyword(&word) {
            let members = self.member_list()?;
            return Ok(Statement::List {
                subject,
                relation,
                members,
            });
        }

        let relation = Relation::from_keyword(&word).ok_or(GrammarError::UnknownRelation {
            position,
            fragment: word,
        })?;

        if self.peek_kind(0) == Some(&TokenKind::LParen) {
            let open = self.position();
            self.pos += 1;
            self.enter(open)?;
            let nested = self.statement()?;
            self.leave();
            self.expect(TokenKind::RParen, "')' closing the nested statement")?;
            if let Statement::Term(_) = nested {
                return Err(GrammarError::UnexpectedToken {
                    position: open,
                    fragment: "(".into(),
                    expected: "a nested statement with a relation".into(),
                }
                .into());
            }
            return Ok(Statement::Nested {
                subject,
                relation,
                nested: Box::new(nested),
            });
        }

        let object = self.subject_term()?;
        Ok(Statement::Relation {
            subject,
            relation,
            object,
        })
    }

    /// `list(term, term, ...)` after `hasMembers` / `hasComponents`.
    fn member_list(&mut self) -> BelResult<Vec<Term>> {
        let (word, position) = self.expect_word("list(...)")?;
        if word != "list" {
            return Err(GrammarError::UnexpectedToken {
                position,
                fragment: word,
                expected: "list(...)".into(),
            }
            .into());
        }
        self.expect(TokenKind::LParen, "'(' after list")?;
        let members = self.term_sequence()?;
        self.expect(TokenKind::RParen, "')' closing list")?;
        Ok(members)
    }

    /// Comma-separated terms up to (not including) the closing paren.
    fn term_sequence(&mut self) -> BelResult<Vec<Term>> {
        let mut terms = Vec::new();
        if self.peek_kind(0) == Some(&TokenKind::RParen) {
            return Ok(terms);
        }
        loop {
            terms.push(self.term()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(terms)
    }

    // ── Modifiers ──────────────────────────────────────────────────────

    pub fn subject_term(&mut self) -> BelResult<SubjectTerm> {
        let Some(TokenKind::Word(word)) = self.peek_kind(0).cloned() else {
            let token = self.next("a term")?;
            return Err(unexpected(&token, "a term"));
        };

        let position = self.position();
        let modifier_kind = match word.as_str() {
            "act" | "activity" => Some(ModifierKind::Activity),
            "deg" | "degradation" => Some(ModifierKind::Degradation),
            "tloc" | "translocation" => Some(ModifierKind::Translocation),
            "sec" | "cellSecretion" => Some(ModifierKind::Secretion),
            "surf" | "cellSurfaceExpression" => Some(ModifierKind::SurfaceExpression),
            other => language::legacy_activity_function(other)
                .map(|label| ModifierKind::LegacyActivity(label.to_string())),
        };
        let Some(kind) = modifier_kind else {
            return Ok(SubjectTerm::Bare(self.term()?));
        };

        self.pos += 1;
        self.enter(position)?;
        self.expect(TokenKind::LParen, "'(' after modifier")?;
        let term = self.term()?;

        let modifier = match kind {
            ModifierKind::Activity => {
                let activity = if self.eat(&TokenKind::Comma) {
                    Some(self.molecular_activity()?)
                } else {
                    None
                };
                Modifier::Activity { activity }
            }
            ModifierKind::LegacyActivity(label) => {
                self.require_legacy(position, &word)?;
                Modifier::LegacyActivity { label }
            }
            ModifierKind::Degradation => Modifier::Degradation,
            ModifierKind::Translocation => self.translocation(position, &word)?,
            ModifierKind::Secretion => Modifier::CellSecretion,
            ModifierKind::SurfaceExpression => Modifier::CellSurfaceExpression,
        };

        self.expect(TokenKind::RParen, "')' closing modifier")?;
        self.leave();
        Ok(SubjectTerm::Modified { modifier, term })
    }

    /// `ma(kin)`, `ma(GOMF:"kinase activity")` or `molecularActivity(...)`.
    fn molecular_activity(&mut self) -> BelResult<ActivityAst> {
        let (word, position) = self.expect_word("ma(...)")?;
        if word != "ma" && word != "molecularActivity" {
            return Err(GrammarError::UnexpectedToken {
                position,
                fragment: word,
                expected: "ma(...)".into(),
            }
            .into());
        }
        self.expect(TokenKind::LParen, "'(' after ma")?;
        let raw = self.raw_identifier()?;
        let activity = match raw.namespace {
            Some(namespace) => ActivityAst::Namespaced(self.checked(namespace, raw.name)?),
            None => {
                let label = language::default_activity(&raw.name).ok_or(
                    GrammarError::UnknownActivity {
                        position: raw.position,
                        fragment: raw.name.clone(),
                    },
                )?;
                ActivityAst::Default(label.to_string())
            }
        };
        self.expect(TokenKind::RParen, "')' closing ma")?;
        Ok(activity)
    }

    /// The location arguments of `tloc`, after its term.
    fn translocation(&mut self, position: usize, keyword: &str) -> BelResult<Modifier> {
        let arity_error = || GrammarError::InvalidTranslocationArity {
            position,
            fragment: keyword.to_string(),
        };

        if !self.eat(&TokenKind::Comma) {
            return Err(arity_error().into());
        }
        let from = self.location(&["fromLoc", "fromLocation"])?;
        if !self.eat(&TokenKind::Comma) {
            return Err(arity_error().into());
        }
        let to = self.location(&["toLoc", "toLocation"])?;
        Ok(Modifier::Translocation { from, to })
    }

    /// `fromLoc(NS:x)` / `toLoc(NS:x)` or a bare identifier.
    fn location(&mut self, wrappers: &[&str]) -> BelResult<Entity> {
        if self.at_call(wrappers) {
            self.pos += 1;
            self.expect(TokenKind::LParen, "'(' after location")?;
            let entity = self.entity()?;
            self.expect(TokenKind::RParen, "')' closing location")?;
            Ok(entity)
        } else {
            self.entity()
        }
    }

    // ── Terms ──────────────────────────────────────────────────────────

    pub fn term(&mut self) -> BelResult<Term> {
        let (word, position) = self.expect_word("a term function")?;
        let function = Function::from_keyword(&word).ok_or(GrammarError::UnknownFunction {
            position,
            fragment: word.clone(),
        })?;

        self.enter(position)?;
        self.expect(TokenKind::LParen, "'(' after function")?;

        let term = match function {
            Function::Reaction => self.reaction(position)?,
            _ if function.is_list() && !self.at_identifier() => {
                let members = self.term_sequence()?;
                if members.is_empty() {
                    return Err(GrammarError::EmptyList { position, fragment: word }.into());
                }
                Term::List { function, members, position }
            }
            _ if self.at_call(&["fus", "fusion"]) => {
                if !function.supports_fusion() {
                    return Err(GrammarError::InvalidFusion {
                        position,
                        fragment: word,
                        message: format!("{} terms cannot be fusions", function.label()),
                    }
                    .into());
                }
                Term::Fusion {
                    function,
                    fusion: self.modern_fusion()?,
                    position,
                }
            }
            _ => self.simple_term(function, position)?,
        };

        self.expect(TokenKind::RParen, "')' closing term")?;
        self.leave();
        Ok(term)
    }

    /// Whether the next argument is a name rather than a nested term.
    fn at_identifier(&self) -> bool {
        match self.peek_kind(0) {
            Some(TokenKind::Quoted(_)) => true,
            Some(TokenKind::Word(_)) => self.peek_kind(1) != Some(&TokenKind::LParen),
            _ => false,
        }
    }

    fn reaction(&mut self, position: usize) -> BelResult<Term> {
        let reactants = self.participants(&["reactants"])?;
        self.expect(TokenKind::Comma, "',' between reactants and products")?;
        let products = self.participants(&["products"])?;
        Ok(Term::Reaction {
            reactants,
            products,
            position,
        })
    }

    fn participants(&mut self, keywords: &[&str]) -> BelResult<Vec<Term>> {
        if !self.at_call(keywords) {
            let token = self.next(keywords[0])?;
            return Err(unexpected(&token, &format!("{}(...)", keywords[0])));
        }
        self.pos += 1;
        self.expect(TokenKind::LParen, "'('")?;
        let terms = self.term_sequence()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(terms)
    }

    fn simple_term(&mut self, function: Function, position: usize) -> BelResult<Term> {
        let entity = self.entity()?;
        let mut variants = Vec::new();

        while self.eat(&TokenKind::Comma) {
            if self.at_call(&["fus", "fusion"]) {
                // BEL 1.0: p(NS:A, fus(NS:B, 1875, 2626))
                let fus_position = self.position();
                self.require_legacy(fus_position, "fus")?;
                if !function.supports_fusion() || !variants.is_empty() {
                    return Err(GrammarError::InvalidFusion {
                        position: fus_position,
                        fragment: "fus".into(),
                        message: "a legacy fusion must be the only argument after the 5' partner"
                            .into(),
                    }
                    .into());
                }
                let fusion = self.legacy_fusion(entity)?;
                if self.peek_kind(0) == Some(&TokenKind::Comma) {
                    return Err(GrammarError::InvalidFusion {
                        position: self.position(),
                        fragment: ",".into(),
                        message: "fusions cannot carry further variants".into(),
                    }
                    .into());
                }
                return Ok(Term::Fusion {
                    function,
                    fusion,
                    position,
                });
            }
            variants.push(self.variant(function)?);
        }

        Ok(Term::Simple {
            function,
            entity,
            variants,
            position,
        })
    }

    // ── Variants ───────────────────────────────────────────────────────

    fn variant(&mut self, function: Function) -> BelResult<VariantAst> {
        let (word, position) = self.expect_word("a variant")?;
        let invalid = |message: String| GrammarError::InvalidVariant {
            position,
            fragment: word.clone(),
            message,
        };

        if !function.supports_variants() {
            return Err(invalid(format!("{} terms cannot carry variants", function.label())).into());
        }
        let allowed = match word.as_str() {
            "var" | "variant" => true,
            "pmod" | "proteinModification" | "frag" | "fragment" | "trunc" | "truncation" => {
                function == Function::Protein
            }
            "gmod" | "geneModification" => function == Function::Gene,
            "sub" | "substitution" => matches!(function, Function::Protein | Function::Gene),
            _ => return Err(invalid("unknown variant function".into()).into()),
        };
        if !allowed {
            return Err(invalid(format!("not valid inside a {} term", function.label())).into());
        }

        self.expect(TokenKind::LParen, "'(' after variant")?;
        let variant = match word.as_str() {
            "var" | "variant" => {
                let (hgvs, _) = self.expect_value("an HGVS string")?;
                VariantAst::Hgvs(hgvs)
            }
            "pmod" | "proteinModification" => self.protein_modification()?,
            "gmod" | "geneModification" => {
                let identifier = self.modification_identifier(language::gmod_name)?;
                VariantAst::GeneModification(identifier)
            }
            "frag" | "fragment" => {
                let (range, _) = self.expect_value("a fragment range")?;
                let description = if self.eat(&TokenKind::Comma) {
                    Some(self.expect_value("a fragment description")?.0)
                } else {
                    None
                };
                VariantAst::Fragment { range, description }
            }
            "sub" | "substitution" => {
                self.require_legacy(position, &word)?;
                let (reference, _) = self.expect_word("a reference residue")?;
                self.expect(TokenKind::Comma, "','")?;
                let position = self.number("a position")?;
                self.expect(TokenKind::Comma, "','")?;
                let (variant, _) = self.expect_word("a variant residue")?;
                VariantAst::Substitution {
                    reference,
                    position,
                    variant,
                }
            }
            _ => {
                self.require_legacy(position, &word)?;
                VariantAst::Truncation {
                    position: self.number("a truncation position")?,
                }
            }
        };
        self.expect(TokenKind::RParen, "')' closing variant")?;
        Ok(variant)
    }

    /// `pmod(Ph)`, `pmod(Ph, Ser, 473)`, `pmod(MOD:x, S)`, BEL 1.0 `pmod(P, S, 473)`.
    fn protein_modification(&mut self) -> BelResult<VariantAst> {
        let identifier = self.modification_identifier(language::pmod_name)?;

        let code = if self.eat(&TokenKind::Comma) {
            let (residue, position) = self.expect_word("an amino acid code")?;
            let code = language::amino_acid(&residue).ok_or(GrammarError::InvalidVariant {
                position,
                fragment: residue.clone(),
                message: "unknown amino acid".into(),
            })?;
            Some(code.to_string())
        } else {
            None
        };

        let position = if code.is_some() && self.eat(&TokenKind::Comma) {
            Some(self.number("a residue position")?)
        } else {
            None
        };

        Ok(VariantAst::ProteinModification {
            identifier,
            code,
            position,
        })
    }

    fn modification_identifier(
        &mut self,
        lookup: fn(&str) -> Option<&'static str>,
    ) -> BelResult<ModIdentifier> {
        let raw = self.raw_identifier()?;
        match raw.namespace {
            Some(namespace) => Ok(ModIdentifier::Namespaced(self.checked(namespace, raw.name)?)),
            None => {
                let name = lookup(&raw.name).ok_or(GrammarError::InvalidVariant {
                    position: raw.position,
                    fragment: raw.name.clone(),
                    message: "unknown modification".into(),
                })?;
                if language::is_legacy_pmod_code(&raw.name) && raw.name != name {
                    self.require_legacy(raw.position, &raw.name)?;
                }
                Ok(ModIdentifier::Default(name.to_string()))
            }
        }
    }

    fn number(&mut self, expected: &str) -> BelResult<u32> {
        let (word, position) = self.expect_word(expected)?;
        word.parse().map_err(|_| {
            GrammarError::InvalidVariant {
                position,
                fragment: word.clone(),
                message: format!("expected {expected}"),
            }
            .into()
        })
    }

    /// A number or `?` for an unknown breakpoint.
    fn breakpoint(&mut self) -> BelResult<Option<u32>> {
        if matches!(self.peek_kind(0), Some(TokenKind::Word(w)) if w == "?") {
            self.pos += 1;
            return Ok(None);
        }
        Ok(Some(self.number("a breakpoint")?))
    }

    // ── Fusions ────────────────────────────────────────────────────────

    /// `fus(NS:A, "r.1_79", NS:B, "r.312_5034")` or `fus(NS:A, NS:B)`.
    fn modern_fusion(&mut self) -> BelResult<FusionAst> {
        self.pos += 1;
        self.expect(TokenKind::LParen, "'(' after fus")?;
        let partner_5p = self.entity()?;
        self.expect(TokenKind::Comma, "',' after the 5' partner")?;
        let range_5p = if self.at_namespaced_entity() {
            None
        } else {
            let range = self.expect_value("a 5' range")?.0;
            self.expect(TokenKind::Comma, "',' after the 5' range")?;
            Some(range)
        };
        let partner_3p = self.entity()?;
        let range_3p = if self.eat(&TokenKind::Comma) {
            Some(self.expect_value("a 3' range")?.0)
        } else {
            None
        };
        self.expect(TokenKind::RParen, "')' closing fus")?;
        Ok(FusionAst::Modern {
            partner_5p,
            range_5p,
            partner_3p,
            range_3p,
        })
    }

    /// `fus(NS:B, 1875, 2626)` following a 5' partner.
    fn legacy_fusion(&mut self, partner_5p: Entity) -> BelResult<FusionAst> {
        self.pos += 1;
        self.expect(TokenKind::LParen, "'(' after fus")?;
        let partner_3p = self.entity()?;
        let (break_5p, start_3p) = if self.eat(&TokenKind::Comma) {
            let break_5p = self.breakpoint()?;
            self.expect(TokenKind::Comma, "',' between breakpoints")?;
            (break_5p, self.breakpoint()?)
        } else {
            (None, None)
        };
        self.expect(TokenKind::RParen, "')' closing fus")?;
        Ok(FusionAst::Legacy {
            partner_5p,
            partner_3p,
            break_5p,
            start_3p,
        })
    }

    fn at_namespaced_entity(&self) -> bool {
        matches!(self.peek_kind(0), Some(TokenKind::Word(_)))
            && self.peek_kind(1) == Some(&TokenKind::Colon)
    }

    // ── Identifiers ────────────────────────────────────────────────────

    fn raw_identifier(&mut self) -> BelResult<RawIdentifier> {
        let token = self.next("an identifier")?;
        let position = token.span.start;
        match token.kind {
            TokenKind::Word(first) if self.peek_kind(0) == Some(&TokenKind::Colon) => {
                self.pos += 1;
                let name_token = self.next("a name after ':'")?;
                match name_token.kind {
                    TokenKind::Word(name) | TokenKind::Quoted(name) => Ok(RawIdentifier {
                        namespace: Some(first),
                        name,
                        position,
                    }),
                    _ => Err(GrammarError::MalformedIdentifier {
                        position,
                        fragment: format!("{first}:{}", name_token.fragment()),
                    }
                    .into()),
                }
            }
            TokenKind::Word(name) | TokenKind::Quoted(name) => {
                if self.peek_kind(0) == Some(&TokenKind::Colon) {
                    // "NS":name
                    return Err(GrammarError::MalformedIdentifier {
                        position,
                        fragment: format!("\"{name}\":"),
                    }
                    .into());
                }
                Ok(RawIdentifier {
                    namespace: None,
                    name,
                    position,
                })
            }
            TokenKind::Colon => Err(GrammarError::MalformedIdentifier {
                position,
                fragment: ":".into(),
            }
            .into()),
            _ => Err(unexpected(&token, "an identifier")),
        }
    }

    /// Read an entity, validating its namespace or deferring a naked name.
    fn entity(&mut self) -> BelResult<Entity> {
        let raw = self.raw_identifier()?;
        match raw.namespace {
            Some(namespace) => self.checked(namespace, raw.name),
            None => {
                if !self.config.allow_naked_names {
                    self.naked.push((raw.position, raw.name.clone()));
                }
                Ok(Entity::new("", raw.name))
            }
        }
    }

    fn checked(&self, namespace: String, name: String) -> BelResult<Entity> {
        let entity = Entity::new(namespace, name);
        self.resolver.check(&entity)?;
        Ok(entity)
    }
}

enum ModifierKind {
    Activity,
    LegacyActivity(String),
    Degradation,
    Translocation,
    Secretion,
    SurfaceExpression,
}

fn unexpected(token: &Token, expected: &str) -> crate::error::BelError {
    GrammarError::UnexpectedToken {
        position: token.span.start,
        fragment: token.fragment(),
        expected: expected.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BelError, NamespaceError};
    use crate::namespace::{AllowAll, NamespaceSet};

    fn parse(input: &str) -> BelResult<Statement> {
        parse_statement(input, &AllowAll, &ParserConfig::default())
    }

    fn term(input: &str) -> Term {
        match parse(input).unwrap() {
            Statement::Term(SubjectTerm::Bare(term)) => term,
            other => panic!("expected bare term, got {other:?}"),
        }
    }

    fn grammar_err(input: &str) -> GrammarError {
        match parse(input) {
            Err(BelError::Grammar(e)) => e,
            other => panic!("expected grammar error, got {other:?}"),
        }
    }

    #[test]
    fn parse_simple_protein() {
        let t = term("p(HGNC:AKT1)");
        assert_eq!(
            t,
            Term::Simple {
                function: Function::Protein,
                entity: Entity::new("HGNC", "AKT1"),
                variants: vec![],
                position: 0,
            }
        );
    }

    #[test]
    fn long_and_short_forms_agree() {
        let short = term("p(HGNC:AKT1)");
        let long = term("proteinAbundance(HGNC:AKT1)");
        assert_eq!(short.function(), long.function());
    }

    #[test]
    fn parse_relation_statement() {
        let stmt = parse("p(HGNC:AKT1) -> bp(GO:\"cell death\")").unwrap();
        match stmt {
            Statement::Relation { relation, object, .. } => {
                assert_eq!(relation, Relation::Increases);
                assert_eq!(object.term().function(), Function::BiologicalProcess);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_nested_statement() {
        let stmt = parse("p(HGNC:A) increases (p(HGNC:B) decreases p(HGNC:C))").unwrap();
        match stmt {
            Statement::Nested { nested, relation, .. } => {
                assert_eq!(relation, Relation::Increases);
                assert!(matches!(
                    *nested,
                    Statement::Relation {
                        relation: Relation::Decreases,
                        ..
                    }
                ));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_list_statement() {
        let stmt = parse("p(SFAM:\"AKT Family\") hasMembers list(p(HGNC:AKT1), p(HGNC:AKT2))").unwrap();
        match stmt {
            Statement::List { relation, members, .. } => {
                assert_eq!(relation, Relation::HasMember);
                assert_eq!(members.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_complex_named_and_listed() {
        assert!(matches!(term("complex(SCOMP:\"AP-1 Complex\")"), Term::Simple { .. }));
        match term("complex(p(HGNC:FOS), p(HGNC:JUN))") {
            Term::List { members, .. } => assert_eq!(members.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_list_abundance_is_rejected() {
        for text in ["complex()", "composite() -> bp(GO:x)"] {
            let err = grammar_err(text);
            assert!(matches!(err, GrammarError::EmptyList { .. }), "{text}: {err:?}");
            assert_eq!(err.position(), Some(0));
        }
    }

    #[test]
    fn quoted_identifier_keeps_commas_and_parens() {
        let stmt = parse("a(CHEBI:\"1,2-di (x), y\") -> p(HGNC:A)").unwrap();
        match stmt.subject().term() {
            Term::Simple { entity, .. } => assert_eq!(entity, &Entity::new("CHEBI", "1,2-di (x), y")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(stmt, Statement::Relation { relation: Relation::Increases, .. }));
    }

    #[test]
    fn parse_reaction() {
        match term("rxn(reactants(a(CHEBI:superoxide)), products(a(CHEBI:\"hydrogen peroxide\"), a(CHEBI:oxygen)))") {
            Term::Reaction { reactants, products, .. } => {
                assert_eq!(reactants.len(), 1);
                assert_eq!(products.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_variants() {
        match term("p(HGNC:AKT1, pmod(Ph, S, 473), var(\"p.Ala127Tyr\"))") {
            Term::Simple { variants, .. } => {
                assert_eq!(
                    variants[0],
                    VariantAst::ProteinModification {
                        identifier: ModIdentifier::Default("Ph".into()),
                        code: Some("Ser".into()),
                        position: Some(473),
                    }
                );
                assert_eq!(variants[1], VariantAst::Hgvs("p.Ala127Tyr".into()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn legacy_pmod_code_translates() {
        match term("p(HGNC:AKT1, pmod(P, S, 473))") {
            Term::Simple { variants, .. } => assert!(matches!(
                &variants[0],
                VariantAst::ProteinModification { identifier: ModIdentifier::Default(n), .. } if n == "Ph"
            )),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_fusions() {
        assert!(matches!(
            term("p(fus(HGNC:TMPRSS2, \"r.1_79\", HGNC:ERG, \"r.312_5034\"))"),
            Term::Fusion { fusion: FusionAst::Modern { .. }, .. }
        ));
        assert!(matches!(
            term("p(HGNC:BCR, fus(HGNC:JAK2, 1875, 2626))"),
            Term::Fusion {
                fusion: FusionAst::Legacy {
                    break_5p: Some(1875),
                    start_3p: Some(2626),
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn parse_modifiers() {
        let kin = parse_term("kin(p(HGNC:AKT1))", &AllowAll, &ParserConfig::default()).unwrap();
        assert_eq!(
            kin.modifier(),
            Some(&Modifier::LegacyActivity {
                label: "KinaseActivity".into()
            })
        );
        let act = parse_term("act(p(HGNC:AKT1), ma(kin))", &AllowAll, &ParserConfig::default()).unwrap();
        assert_eq!(
            act.modifier(),
            Some(&Modifier::Activity {
                activity: Some(ActivityAst::Default("KinaseActivity".into()))
            })
        );
    }

    #[test]
    fn translocation_forms_agree() {
        let config = ParserConfig::default();
        let long = parse_term(
            "tloc(p(HGNC:EGFR), fromLoc(GOCC:\"cell surface\"), toLoc(GOCC:endosome))",
            &AllowAll,
            &config,
        )
        .unwrap();
        let bare = parse_term(
            "tloc(p(HGNC:EGFR), GOCC:\"cell surface\", GOCC:endosome)",
            &AllowAll,
            &config,
        )
        .unwrap();
        assert_eq!(long, bare);
    }

    #[test]
    fn translocation_without_locations_fails() {
        assert!(matches!(
            grammar_err("tloc(a(\"T-Lymphocytes\"))"),
            GrammarError::InvalidTranslocationArity { position: 0, .. }
        ));
        assert!(matches!(
            grammar_err("tloc(p(HGNC:EGFR), GOCC:endosome)"),
            GrammarError::InvalidTranslocationArity { .. }
        ));
    }

    #[test]
    fn naked_names_rejected_by_default() {
        assert!(matches!(
            grammar_err("a(\"T-Lymphocytes\")"),
            GrammarError::NakedName { position: 2, .. }
        ));
        let config = ParserConfig {
            allow_naked_names: true,
            ..ParserConfig::default()
        };
        assert!(parse_statement("a(\"T-Lymphocytes\")", &AllowAll, &config).is_ok());
    }

    #[test]
    fn unknown_function_and_relation() {
        assert!(matches!(
            grammar_err("protein(HGNC:AKT1)"),
            GrammarError::UnknownFunction { position: 0, .. }
        ));
        assert!(matches!(
            grammar_err("p(HGNC:A) boosts p(HGNC:B)"),
            GrammarError::UnknownRelation { position: 10, .. }
        ));
    }

    #[test]
    fn malformed_identifier() {
        assert!(matches!(
            grammar_err("p(HGNC:)"),
            GrammarError::MalformedIdentifier { .. }
        ));
    }

    #[test]
    fn trailing_and_incomplete_input() {
        assert!(matches!(
            grammar_err("p(HGNC:A) -> p(HGNC:B) p(HGNC:C)"),
            GrammarError::TrailingInput { .. }
        ));
        assert!(matches!(
            grammar_err("p(HGNC:A"),
            GrammarError::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let config = ParserConfig {
            max_depth: 3,
            ..ParserConfig::default()
        };
        let deep = "complex(complex(complex(complex(p(HGNC:A)))))";
        assert!(matches!(
            parse_statement(deep, &AllowAll, &config),
            Err(BelError::Grammar(GrammarError::NestingTooDeep { max_depth: 3, .. }))
        ));
    }

    #[test]
    fn legacy_forms_can_be_disabled() {
        let config = ParserConfig {
            allow_legacy: false,
            ..ParserConfig::default()
        };
        assert!(matches!(
            parse_statement("kin(p(HGNC:AKT1))", &AllowAll, &config),
            Err(BelError::Grammar(GrammarError::LegacyDisabled { .. }))
        ));
        assert!(matches!(
            parse_statement("p(HGNC:A, sub(A, 127, Y))", &AllowAll, &config),
            Err(BelError::Grammar(GrammarError::LegacyDisabled { .. }))
        ));
    }

    #[test]
    fn variants_restricted_by_function() {
        assert!(matches!(
            grammar_err("bp(GO:apoptosis, var(\"p.Ala1Tyr\"))"),
            GrammarError::InvalidVariant { .. }
        ));
        assert!(matches!(
            grammar_err("g(HGNC:A, pmod(Ph))"),
            GrammarError::InvalidVariant { .. }
        ));
    }

    #[test]
    fn namespace_resolver_is_consulted() {
        let mut set = NamespaceSet::new();
        set.add_enumerated("HGNC", ["AKT1".to_string()]);
        let config = ParserConfig::default();
        assert!(parse_statement("p(HGNC:AKT1)", &set, &config).is_ok());
        assert!(matches!(
            parse_statement("p(HGNC:AKT9)", &set, &config),
            Err(BelError::Namespace(NamespaceError::UnknownTerm { .. }))
        ));
        assert!(matches!(
            parse_statement("p(MGI:Akt1)", &set, &config),
            Err(BelError::Namespace(NamespaceError::UnknownNamespace { .. }))
        ));
    }
}
