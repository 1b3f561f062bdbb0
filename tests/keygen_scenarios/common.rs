use std::sync::Arc;

use serde_json::Value as JsonValue;
use strata_keygen::{
    CounterAllocator, Database, Document, DocumentWriter, Field, FieldType, Index, KeyGenerator,
    KeygenConfig, RequestContext, TransactionalStore,
};

pub struct Env {
    pub db: Arc<Database>,
    pub generator: KeyGenerator,
    pub ctx: RequestContext,
}

impl Env {
    pub fn new() -> Self {
        let db = Arc::new(Database::new());
        let store: Arc<dyn TransactionalStore> = db.clone();
        let generator = KeyGenerator::for_store(store, &KeygenConfig::default()).unwrap();
        Self {
            db,
            generator,
            ctx: RequestContext::new(),
        }
    }

    pub fn counter(&self) -> &CounterAllocator {
        self.generator.synthesizer().counter()
    }

    pub fn writer(&self) -> DocumentWriter {
        DocumentWriter::new(self.db.clone(), &KeygenConfig::default()).unwrap()
    }
}

pub fn auto_index(name: &str, t: FieldType) -> Index {
    Index::primary(vec![Field::new(name, t).auto_generated()]).unwrap()
}

pub fn doc(v: JsonValue) -> Document {
    Document::from_json(v).unwrap()
}
