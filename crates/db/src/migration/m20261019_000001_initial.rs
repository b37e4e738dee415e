//! Initial database migration.
//!
//! Creates companies, employees, worker-loan transactions, ART results,
//! employee images and the cached feed items.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: COMPANIES & EMPLOYEES
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(EMPLOYEES_SQL).await?;

        // ============================================================
        // PART 3: WORKER LOANS
        // ============================================================
        db.execute_unprepared(LOAN_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: COMPLIANCE & MEDIA
        // ============================================================
        db.execute_unprepared(ART_TESTS_SQL).await?;
        db.execute_unprepared(EMPLOYEE_IMAGES_SQL).await?;

        // ============================================================
        // PART 5: FEEDS
        // ============================================================
        db.execute_unprepared(FEED_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE loan_status AS ENUM ('pending', 'accepted', 'rejected');
CREATE TYPE feed_kind AS ENUM ('news', 'updates');
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    uen             VARCHAR(10) PRIMARY KEY,
    name            VARCHAR(255) NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_company_uen_length CHECK (char_length(uen) BETWEEN 9 AND 10),
    CONSTRAINT chk_company_name_not_blank CHECK (char_length(btrim(name)) > 0)
);
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    work_permit_number          VARCHAR(32) PRIMARY KEY,
    company_id                  VARCHAR(10) NOT NULL REFERENCES companies(uen) ON DELETE CASCADE,
    name                        VARCHAR(255) NOT NULL,
    passport_number             VARCHAR(32) NOT NULL,
    work_id                     VARCHAR(32) NOT NULL,
    employee_role               VARCHAR(100) NOT NULL,
    levy                        INTEGER NOT NULL DEFAULT 0,
    work_permit_date_of_issue   DATE NOT NULL,
    work_permit_expiry_date     DATE NOT NULL,
    work_contact_number         VARCHAR(8) NOT NULL,
    work_site_location          VARCHAR(255) NOT NULL,
    singapore_address           VARCHAR(255) NOT NULL,
    vaccination_status          BOOLEAN NOT NULL DEFAULT FALSE,
    for_sharing                 BOOLEAN NOT NULL DEFAULT FALSE,
    shared                      BOOLEAN NOT NULL DEFAULT FALSE,
    description                 TEXT,
    created_at                  TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_employee_levy_non_negative CHECK (levy >= 0)
);

CREATE INDEX idx_employees_company ON employees(company_id);
";

// The overlap rule is enforced by the application. The unique index on
// (employee_id, loan_start_date) only catches concurrent submissions that
// start on the same day.
const LOAN_TRANSACTIONS_SQL: &str = r"
CREATE TABLE loan_transactions (
    loaning_company_id      VARCHAR(10) NOT NULL REFERENCES companies(uen) ON DELETE CASCADE,
    borrowing_company_id    VARCHAR(10) NOT NULL REFERENCES companies(uen) ON DELETE CASCADE,
    employee_id             VARCHAR(32) NOT NULL REFERENCES employees(work_permit_number) ON DELETE CASCADE,
    loan_start_date         DATE NOT NULL,
    loan_end_date           DATE NOT NULL,
    total_cost              NUMERIC(19, 2) NOT NULL,
    status                  loan_status NOT NULL DEFAULT 'pending',

    PRIMARY KEY (loaning_company_id, borrowing_company_id, employee_id, loan_start_date),
    CONSTRAINT chk_loan_dates CHECK (loan_end_date > loan_start_date),
    CONSTRAINT chk_loan_cost_non_negative CHECK (total_cost >= 0)
);

CREATE UNIQUE INDEX uq_loan_employee_start ON loan_transactions(employee_id, loan_start_date);
CREATE INDEX idx_loan_loaning_company ON loan_transactions(loaning_company_id, loan_start_date);
CREATE INDEX idx_loan_borrowing_company ON loan_transactions(borrowing_company_id, loan_start_date);
";

const ART_TESTS_SQL: &str = r"
CREATE TABLE art_tests (
    id              BIGSERIAL PRIMARY KEY,
    employee_id     VARCHAR(32) NOT NULL REFERENCES employees(work_permit_number) ON DELETE CASCADE,
    company_id      VARCHAR(10) NOT NULL REFERENCES companies(uen) ON DELETE CASCADE,
    date_of_test    DATE NOT NULL,
    expiry_date     DATE NOT NULL,
    result          BOOLEAN NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_art_expiry CHECK (expiry_date >= date_of_test)
);

CREATE INDEX idx_art_company_employee_date ON art_tests(company_id, employee_id, date_of_test DESC);
";

const EMPLOYEE_IMAGES_SQL: &str = r"
CREATE TABLE employee_images (
    id              BIGSERIAL PRIMARY KEY,
    employee_id     VARCHAR(32) NOT NULL REFERENCES employees(work_permit_number) ON DELETE CASCADE,
    url             TEXT NOT NULL,
    storage_key     TEXT NOT NULL,
    content_type    VARCHAR(100) NOT NULL,
    uploaded_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_employee_images_latest ON employee_images(employee_id, uploaded_at DESC, id DESC);
";

const FEED_ITEMS_SQL: &str = r"
CREATE TABLE feed_items (
    id              BIGSERIAL PRIMARY KEY,
    kind            feed_kind NOT NULL,
    position        INTEGER NOT NULL,
    header          TEXT NOT NULL,
    url             TEXT NOT NULL,
    excerpt         TEXT,
    image_url       TEXT,
    published       VARCHAR(100),
    fetched_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_feed_kind_position UNIQUE (kind, position)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS feed_items CASCADE;
DROP TABLE IF EXISTS employee_images CASCADE;
DROP TABLE IF EXISTS art_tests CASCADE;
DROP TABLE IF EXISTS loan_transactions CASCADE;
DROP TABLE IF EXISTS employees CASCADE;
DROP TABLE IF EXISTS companies CASCADE;
DROP TYPE IF EXISTS feed_kind;
DROP TYPE IF EXISTS loan_status;
";
