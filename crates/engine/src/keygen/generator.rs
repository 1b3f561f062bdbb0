//! Primary key generation for insert/replace
//!
//! For each field of the primary index, in index order:
//!
//! 1. Auto-generated field that is missing, null or zero → synthesize a value
//!    and record a patch for the document.
//! 2. Field missing or null without auto-generation → `MissingKeyColumn`.
//! 3. Otherwise parse the supplied value as the declared type.
//!
//! Every field's value is appended to the response fragment and to the
//! ordered values handed to the [`KeyEncoder`]. Patches are applied to a
//! copy of the document only after every field succeeded; the caller's
//! document is never modified.

use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

use strata_core::{
    Document, FieldSlot, FieldType, Index, Key, StrataError, StrataResult, TypedValue,
};

use super::absence::{is_absent, raw_text};
use super::counter::CounterAllocator;
use super::encoder::{KeyEncoder, TupleKeyEncoder};
use super::synthesizer::ValueSynthesizer;
use crate::context::RequestContext;
use crate::database::KeygenConfig;
use crate::transaction_ops::TransactionalStore;

/// Output of [`KeyGenerator::generate`]
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedKey {
    /// Encoded storage key
    pub key: Key,
    /// The input document with synthesized values filled in
    pub document: Document,
    /// Key field values in index order, as they appear in the response
    pub response: Vec<(String, JsonValue)>,
    /// Whether the write must not overwrite an existing row
    pub force_insert: bool,
}

impl GeneratedKey {
    /// Key-only JSON object, e.g. `{"tenant":"acme","id":7}`
    ///
    /// Fields keep index order.
    pub fn response_fragment(&self) -> String {
        let mut out = String::from("{");
        for (i, (name, value)) in self.response.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&JsonValue::String(name.clone()).to_string());
            out.push(':');
            out.push_str(&value.to_string());
        }
        out.push('}');
        out
    }
}

/// Generates primary keys and fills in auto-generated fields
#[derive(Clone)]
pub struct KeyGenerator {
    synthesizer: ValueSynthesizer,
    encoder: Arc<dyn KeyEncoder>,
}

impl KeyGenerator {
    /// Generator with an explicit synthesizer and encoder
    pub fn new(synthesizer: ValueSynthesizer, encoder: Arc<dyn KeyEncoder>) -> Self {
        Self {
            synthesizer,
            encoder,
        }
    }

    /// Generator over `store` with the tuple encoder and configured counter retries
    pub fn for_store(
        store: Arc<dyn TransactionalStore>,
        config: &KeygenConfig,
    ) -> StrataResult<Self> {
        let counter = CounterAllocator::new(store, config.retry_config()?);
        Ok(Self::new(
            ValueSynthesizer::new(counter),
            Arc::new(TupleKeyEncoder::new()),
        ))
    }

    /// The value synthesizer
    pub fn synthesizer(&self) -> &ValueSynthesizer {
        &self.synthesizer
    }

    /// Produce the key for `document` under `index` of `table`
    ///
    /// # Errors
    /// - `MissingKeyColumn` naming the first required field that is absent
    /// - `MalformedValue` if a supplied value does not parse as its type
    /// - `UnsupportedAutoGenerate` and counter errors from synthesis
    pub fn generate(
        &self,
        ctx: &RequestContext,
        table: &str,
        index: &Index,
        document: &Document,
    ) -> StrataResult<GeneratedKey> {
        let fields = index.fields();
        let mut patches = Vec::new();
        let mut response = Vec::with_capacity(fields.len());
        let mut values = Vec::with_capacity(fields.len());
        let mut force_insert = false;

        for field in fields {
            let supplied = match document.field(&field.name) {
                FieldSlot::Present(v)
                    if !(field.is_auto_generated() && is_absent(field.field_type, &raw_text(v))) =>
                {
                    Some(v)
                }
                _ => None,
            };

            let typed = match supplied {
                Some(v) => TypedValue::parse(field, v)?,
                None if field.is_auto_generated() => {
                    let synthesized = self.synthesizer.synthesize(ctx, table, field)?;
                    debug!(
                        table,
                        field = %field.name,
                        field_type = %field.field_type,
                        value = %synthesized.display,
                        "Synthesized key value"
                    );
                    if matches!(field.field_type, FieldType::Int64 | FieldType::DateTime) {
                        force_insert = true;
                    }
                    patches.push((field.name.clone(), synthesized.value.to_json()));
                    synthesized.value
                }
                None => return Err(StrataError::missing_key_column(&field.name)),
            };

            response.push((field.name.clone(), typed.to_json()));
            values.push(typed.into_value());
        }

        let key = self.encoder.encode_key(table, index, &values)?;
        if force_insert {
            debug!(table, key = %key, "Timestamp-based key forces insert-only write");
        }

        Ok(GeneratedKey {
            key,
            document: document.with_fields(patches),
            response,
            force_insert,
        })
    }
}

impl std::fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGenerator")
            .field("synthesizer", &self.synthesizer)
            .finish()
    }
}
