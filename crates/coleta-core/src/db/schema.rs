//! Canonical SQLite schema for the collection event store.
//!
//! The store mirrors what the inspection service records:
//! - `establishments`, `products`, `analysis_parameters` and
//!   `product_parameters` hold referential data maintained elsewhere
//! - `requisitions` is the append-only history of sample submissions
//! - `requisition_analyses` lists the lab parameters each submission requested
//! - `store_meta` tracks the schema version alongside `PRAGMA user_version`

/// Migration v1: referential tables, requisitions, and store metadata.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS establishments (
    establishment_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    tax_id TEXT,
    inspection_id TEXT,
    address TEXT,
    municipality TEXT,
    report_email TEXT,
    billing_email TEXT
);

CREATE TABLE IF NOT EXISTS products (
    product_id INTEGER PRIMARY KEY,
    establishment_id INTEGER NOT NULL REFERENCES establishments(establishment_id) ON DELETE CASCADE,
    registration_number TEXT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS analysis_parameters (
    parameter_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('MICROBIOLOGICA', 'FISICO-QUIMICA')),
    application TEXT NOT NULL CHECK (application IN ('AGUA', 'PRODUTO'))
);

CREATE TABLE IF NOT EXISTS product_parameters (
    product_id INTEGER NOT NULL REFERENCES products(product_id) ON DELETE CASCADE,
    parameter_id INTEGER NOT NULL REFERENCES analysis_parameters(parameter_id) ON DELETE CASCADE,
    PRIMARY KEY (product_id, parameter_id)
);

CREATE TABLE IF NOT EXISTS requisitions (
    requisition_id INTEGER PRIMARY KEY AUTOINCREMENT,
    submitted_at_us INTEGER NOT NULL,
    establishment_id INTEGER REFERENCES establishments(establishment_id) ON DELETE SET NULL,
    category TEXT NOT NULL,
    collection_date TEXT,
    collection_time TEXT,
    seal_number TEXT,
    notes TEXT,
    collection_point TEXT,
    product_name TEXT,
    reference_month TEXT,
    batch TEXT,
    production_date TEXT,
    expiry_date TEXT
);

CREATE TABLE IF NOT EXISTS requisition_analyses (
    requisition_id INTEGER NOT NULL REFERENCES requisitions(requisition_id) ON DELETE CASCADE,
    parameter_id INTEGER NOT NULL REFERENCES analysis_parameters(parameter_id) ON DELETE CASCADE,
    PRIMARY KEY (requisition_id, parameter_id)
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (id, schema_version, created_at_us) VALUES (1, 1, 0);
"#;

/// Migration v2: collection frequency in days plus read-path indexes.
pub const MIGRATION_V2_SQL: &str = r#"
ALTER TABLE requisitions ADD COLUMN frequency_days INTEGER;

CREATE INDEX IF NOT EXISTS idx_requisitions_submitted
    ON requisitions(submitted_at_us DESC, requisition_id DESC);

CREATE INDEX IF NOT EXISTS idx_requisitions_establishment
    ON requisitions(establishment_id, collection_date DESC);

CREATE INDEX IF NOT EXISTS idx_products_establishment
    ON products(establishment_id, name);

UPDATE store_meta
SET schema_version = 2
WHERE id = 1;
"#;

/// Indexes expected by the schedule and history read paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_requisitions_submitted",
    "idx_requisitions_establishment",
    "idx_products_establishment",
];
