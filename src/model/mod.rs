pub mod record;
pub mod registrar;
pub mod validation;

mod inflect;

pub use record::Record;
pub use registrar::EnumOptions;
pub use validation::InclusionRule;

use crate::core::{EnumError, RawValue, Result, Token, TokenInput};
use crate::query::Scope;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One registered enumerated attribute: the attribute name, its ordered
/// allowed values, and the declaration options. Built once at registration
/// and immutable thereafter.
#[derive(Debug, Clone)]
pub struct EnumAttr {
    attribute: String,
    values: Vec<Token>,
    allow_nil: bool,
    method_prefix: Option<String>,
}

impl EnumAttr {
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Allowed values, verbatim in declaration order.
    pub fn values(&self) -> &[Token] {
        &self.values
    }

    pub fn allow_nil(&self) -> bool {
        self.allow_nil
    }

    /// Per-value member base name: `<prefix>_<value>` when a prefix was
    /// declared, `<value>` otherwise.
    pub fn member_name(&self, token: &Token) -> String {
        match &self.method_prefix {
            Some(prefix) => format!("{prefix}_{token}"),
            None => token.as_str().to_string(),
        }
    }
}

/// Target of a generated predicate or mutator: the attribute it reads and
/// the token it compares or assigns.
#[derive(Debug, Clone)]
struct MemberTarget {
    attribute: String,
    token: Token,
}

type ChangeHook = Box<dyn Fn(&Token, Option<&Token>) + Send + Sync>;

/// Declaration-time descriptor of a record model type.
///
/// Holds the registries that [`ModelType::enum_attribute`] populates: the
/// claimed-member name set (collision detection), enumerated attributes,
/// generated predicates and mutators, named scopes, value-list constants,
/// validation rules, and per-attribute change hooks. Generated members are
/// installed once and dispatched by registry lookup thereafter.
pub struct ModelType {
    name: String,
    claimed: HashSet<String>,
    enums: HashMap<String, EnumAttr>,
    predicates: HashMap<String, MemberTarget>,
    mutators: HashMap<String, MemberTarget>,
    scopes: HashMap<String, Scope>,
    constants: HashMap<String, Vec<Token>>,
    validations: Vec<InclusionRule>,
    hooks: HashMap<String, ChangeHook>,
}

impl ModelType {
    /// Create a descriptor for a model backed by the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            name: table.into(),
            claimed: HashSet::new(),
            enums: HashMap::new(),
            predicates: HashMap::new(),
            mutators: HashMap::new(),
            scopes: HashMap::new(),
            constants: HashMap::new(),
            validations: Vec::new(),
            hooks: HashMap::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.name
    }

    /// Whether a generated member of this exact name exists.
    pub fn has_member(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    /// Register a change-notification hook for an attribute.
    ///
    /// The hook fires from the internal setter with `(old, new)` whenever the
    /// attribute transitions away from a non-null value. It may be registered
    /// before or after the enum declaration; presence is checked at write
    /// time.
    pub fn on_change<F>(&mut self, attribute: &str, hook: F)
    where
        F: Fn(&Token, Option<&Token>) + Send + Sync + 'static,
    {
        self.hooks.insert(attribute.to_string(), Box::new(hook));
    }

    pub fn enum_attr(&self, attribute: &str) -> Result<&EnumAttr> {
        self.enums
            .get(attribute)
            .ok_or_else(|| EnumError::UnknownAttribute(attribute.to_string(), self.name.clone()))
    }

    /// Ordered allowed values of an enumerated attribute.
    pub fn allowed_values(&self, attribute: &str) -> Result<&[Token]> {
        Ok(self.enum_attr(attribute)?.values())
    }

    /// Value-list constant by its pluralized, upper-cased name.
    pub fn constant(&self, name: &str) -> Option<&[Token]> {
        self.constants.get(name).map(Vec::as_slice)
    }

    pub fn scope(&self, name: &str) -> Result<&Scope> {
        self.scopes
            .get(name)
            .ok_or_else(|| EnumError::UnknownScope(name.to_string(), self.name.clone()))
    }

    /// Run every installed validation rule against the record's raw storage.
    pub fn validate(&self, record: &dyn Record) -> Result<()> {
        for rule in &self.validations {
            rule.check(&record.read_raw(rule.attribute()))?;
        }
        Ok(())
    }

    pub fn is_valid(&self, record: &dyn Record) -> bool {
        self.validate(record).is_ok()
    }

    /// Plain getter: raw storage normalized to a token; null and empty raw
    /// both read as `None`.
    pub fn get(&self, record: &dyn Record, attribute: &str) -> Result<Option<Token>> {
        let attr = self.enum_attr(attribute)?;
        Ok(record.read_raw(attr.attribute()).to_token())
    }

    /// Plain setter: assigns without persisting.
    pub fn set(
        &self,
        record: &mut dyn Record,
        attribute: &str,
        value: impl TokenInput,
    ) -> Result<Option<Token>> {
        let attr = self.enum_attr(attribute)?;
        self.write_value(record, attr, value.into_token(), false)
    }

    /// Generated predicate, looked up by member base name (`loc_en` for the
    /// member surface `loc_en?`).
    pub fn predicate(&self, record: &dyn Record, member: &str) -> Result<bool> {
        let target = self
            .predicates
            .get(member)
            .ok_or_else(|| EnumError::UnknownMember(member.to_string(), self.name.clone()))?;
        let current = record.read_raw(&target.attribute).to_token();
        Ok(current.as_ref() == Some(&target.token))
    }

    /// Generated mutator, looked up by member base name (`canceled` for the
    /// member surface `canceled!`): assigns the member's value and persists.
    pub fn mutate(&self, record: &mut dyn Record, member: &str) -> Result<Option<Token>> {
        let target = self
            .mutators
            .get(member)
            .ok_or_else(|| EnumError::UnknownMember(member.to_string(), self.name.clone()))?;
        let attr = self.enum_attr(&target.attribute)?;
        let token = target.token.clone();
        self.write_value(record, attr, Some(token), true)
    }

    /// Internal setter shared by the plain setter and the per-value mutators.
    ///
    /// Same-value writes (token equality, both sides possibly null) return
    /// without touching storage, persistence, or the hook. The hook fires
    /// only when the old value is non-null, so null-to-set transitions stay
    /// silent while set-to-null and set-to-set notify.
    fn write_value(
        &self,
        record: &mut dyn Record,
        attr: &EnumAttr,
        value: Option<Token>,
        should_persist: bool,
    ) -> Result<Option<Token>> {
        let old = record.read_raw(attr.attribute()).to_token();
        if old == value {
            return Ok(value);
        }

        record.write_raw(attr.attribute(), RawValue::from_token(value.as_ref()));
        if should_persist {
            record.persist()?;
        }

        if let Some(hook) = self.hooks.get(attr.attribute())
            && let Some(old_token) = old.as_ref()
        {
            hook(old_token, value.as_ref());
        }

        Ok(value)
    }

    pub(crate) fn claim(&mut self, name: String) -> bool {
        self.claimed.insert(name)
    }

    pub(crate) fn install_validation(&mut self, rule: InclusionRule) {
        self.validations.push(rule);
    }

    pub(crate) fn install_constant(&mut self, name: String, values: Vec<Token>) {
        self.constants.insert(name, values);
    }

    pub(crate) fn install_enum(&mut self, attr: EnumAttr) {
        self.enums.insert(attr.attribute().to_string(), attr);
    }

    pub(crate) fn install_predicate(&mut self, member: String, attribute: String, token: Token) {
        self.predicates
            .insert(member, MemberTarget { attribute, token });
    }

    pub(crate) fn install_mutator(&mut self, member: String, attribute: String, token: Token) {
        self.mutators
            .insert(member, MemberTarget { attribute, token });
    }

    pub(crate) fn install_scope(&mut self, scope: Scope) {
        self.scopes.insert(scope.name().to_string(), scope);
    }

    pub(crate) fn constant_name_for(attribute: &str) -> String {
        inflect::constant_name(attribute)
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("name", &self.name)
            .field("enums", &self.enums.keys().collect::<Vec<_>>())
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .field("members", &self.claimed.len())
            .finish()
    }
}
