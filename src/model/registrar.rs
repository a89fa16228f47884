//! Enum-attribute registration.
//!
//! The declaration-time procedure that turns one `(attribute, values,
//! options)` declaration into the full generated surface: validation rule,
//! value-list constant, plain accessors, per-value predicates and mutators,
//! and positive plus negated collection scopes.

use super::{EnumAttr, ModelType};
use crate::core::{EnumError, Result, Token};
use crate::model::validation::InclusionRule;
use crate::query::{Filter, Scope};
use tracing::debug;

/// Options for [`ModelType::enum_attribute`].
#[derive(Debug, Clone, Default)]
pub struct EnumOptions {
    allow_nil: bool,
    method_prefix: Option<String>,
}

impl EnumOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat a null stored value as valid. Settability is never gated by
    /// this; only validity is.
    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    /// Prefix every per-value member name with `<prefix>_`. The plain
    /// accessor surface is never prefixed.
    pub fn method_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.method_prefix = Some(prefix.into());
        self
    }
}

impl ModelType {
    /// Declare an enumerated attribute on this model type.
    ///
    /// Runs once at declaration time and installs, in order: the inclusion
    /// validation rule, the ordered value-list constant, the plain
    /// getter/setter surface, and for each value a predicate (`v?`), a
    /// mutator (`v!`), and a positive scope. Negation scopes (`not_v`) are
    /// installed in a second pass after every positive scope, so a positive
    /// scope named like a computed negation is never shadowed.
    ///
    /// A predicate, mutator, or accessor name that is already taken on this
    /// model type is a fatal [`EnumError::MemberCollision`]; members for the
    /// offending value are not installed. An already-taken negation-scope
    /// name is skipped silently.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumify::{EnumOptions, ModelType};
    ///
    /// # fn main() -> enumify::Result<()> {
    /// let mut model = ModelType::new("subscriptions");
    /// model.enum_attribute(
    ///     "status",
    ///     ["available", "canceled", "completed"],
    ///     EnumOptions::new(),
    /// )?;
    ///
    /// assert!(model.has_member("canceled?"));
    /// assert!(model.has_member("canceled!"));
    /// assert!(model.scope("not_canceled").is_ok());
    /// # Ok(())
    /// # }
    /// ```
    pub fn enum_attribute<I, T>(
        &mut self,
        attribute: &str,
        values: I,
        options: EnumOptions,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        let values: Vec<Token> = values.into_iter().map(Into::into).collect();

        // 1. Inclusion rule on the raw stored value.
        let allowed = values.iter().map(|t| t.as_str().to_string()).collect();
        self.install_validation(InclusionRule::new(attribute, allowed, options.allow_nil));

        // 2. Ordered value list, verbatim, under the pluralized constant name.
        self.install_constant(Self::constant_name_for(attribute), values.clone());

        // 3.-5. Plain accessor surface (never prefixed). Claiming these names
        // makes a re-declaration, or a value spelled like the attribute
        // itself, a collision instead of a silent overwrite.
        for name in [
            attribute.to_string(),
            format!("{attribute}="),
            format!("_set_{attribute}"),
        ] {
            if !self.claim(name.clone()) {
                return Err(EnumError::MemberCollision(name));
            }
        }

        let attr = EnumAttr {
            attribute: attribute.to_string(),
            values: values.clone(),
            allow_nil: options.allow_nil,
            method_prefix: options.method_prefix.clone(),
        };
        let member_names: Vec<String> = values.iter().map(|t| attr.member_name(t)).collect();
        self.install_enum(attr);

        // 6. Per-value members, in declaration order.
        for (token, full_name) in values.iter().zip(&member_names) {
            let predicate_name = format!("{full_name}?");
            let mutator_name = format!("{full_name}!");

            if self.has_member(&predicate_name)
                || self.has_member(&mutator_name)
                || self.has_member(full_name)
            {
                return Err(EnumError::MemberCollision(full_name.clone()));
            }
            self.claim(predicate_name);
            self.claim(mutator_name);
            self.claim(full_name.clone());

            self.install_predicate(full_name.clone(), attribute.to_string(), token.clone());
            self.install_mutator(full_name.clone(), attribute.to_string(), token.clone());
            // Structured equality; the query layer qualifies it to the
            // scope's owning table.
            self.install_scope(Scope::new(
                full_name.clone(),
                Filter::Eq {
                    column: attribute.to_string(),
                    value: token.as_str().to_string(),
                },
            ));
        }

        // 7. Negation scopes, strictly after every positive scope so that a
        // positive scope for `not_expired` is never shadowed by the negation
        // computed for `expired`. An existing member of the same name is
        // skipped, not an error: a more specific declaration may already
        // provide it.
        for (token, full_name) in values.iter().zip(&member_names) {
            let negated = format!("not_{full_name}");
            if self.has_member(&negated) {
                continue;
            }
            self.claim(negated.clone());
            // Table-qualified raw inequality: a joined query against another
            // model carrying the same attribute name must resolve to this
            // model's column.
            self.install_scope(Scope::new(
                negated,
                Filter::NotEqRaw {
                    table: self.table_name().to_string(),
                    column: attribute.to_string(),
                    value: token.as_str().to_string(),
                },
            ));
        }

        debug!(
            model = self.table_name(),
            attribute,
            values = values.len(),
            "registered enumerated attribute"
        );
        Ok(())
    }
}
