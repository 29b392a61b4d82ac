//! Initial database migration.
//!
//! Creates the enums, tables, and indexes for the accounting core:
//! companies, API tokens, clients, accounts, transactions, invoices,
//! expenses, income, quotes, and line items.

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
        // PART 2: TENANCY
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(API_TOKENS_SQL).await?;
        db.execute_unprepared(CLIENTS_SQL).await?;

        // ============================================================
        // PART 3: ACCOUNTS & TRANSACTIONS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: INVOICES & RECURRING-CAPABLE ENTITIES
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_ITEMS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(INCOME_SQL).await?;

        // ============================================================
        // PART 5: QUOTES
        // ============================================================
        db.execute_unprepared(QUOTES_SQL).await?;
        db.execute_unprepared(QUOTE_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Ledger account kinds
CREATE TYPE account_kind AS ENUM (
    'bank',
    'credit_card',
    'cash'
);

-- Transaction entry kinds
CREATE TYPE entry_kind AS ENUM (
    'debit',
    'credit'
);

-- Recurrence frequency for invoices/expenses/income
CREATE TYPE recurring_frequency AS ENUM (
    'none',
    'daily',
    'weekly',
    'monthly',
    'yearly'
);

-- Invoice lifecycle
CREATE TYPE invoice_status AS ENUM (
    'draft',
    'sent',
    'paid',
    'overdue',
    'cancelled'
);

-- Expense lifecycle
CREATE TYPE expense_status AS ENUM (
    'pending',
    'paid'
);

-- Income lifecycle
CREATE TYPE income_status AS ENUM (
    'pending',
    'received'
);

-- Quote lifecycle
CREATE TYPE quote_status AS ENUM (
    'draft',
    'sent',
    'accepted',
    'rejected',
    'expired'
);
";

const COMPANIES_SQL: &str = r"
-- Companies: the tenant boundary
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    currency VARCHAR(3) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const API_TOKENS_SQL: &str = r"
-- API tokens resolve callers to a company; only the hash is stored
CREATE TABLE api_tokens (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    token_hash VARCHAR(64) NOT NULL,
    label VARCHAR(255) NOT NULL,
    revoked_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Token lookup by hash (most common operation)
CREATE INDEX idx_api_tokens_hash ON api_tokens(token_hash) WHERE revoked_at IS NULL;

CREATE INDEX idx_api_tokens_company ON api_tokens(company_id);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    payment_terms_days INT CHECK (payment_terms_days > 0),
    soft_delete BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_clients_company ON clients(company_id) WHERE soft_delete = FALSE;
";

const ACCOUNTS_SQL: &str = r"
-- Accounts: current_balance = initial_balance + signed sum of live transactions
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    kind account_kind NOT NULL,
    currency VARCHAR(3) NOT NULL,
    initial_balance DECIMAL(19, 4) NOT NULL DEFAULT 0,
    current_balance DECIMAL(19, 4) NOT NULL DEFAULT 0,
    soft_delete BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_company ON accounts(company_id) WHERE soft_delete = FALSE;
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    kind entry_kind NOT NULL,
    amount DECIMAL(19, 4) NOT NULL CHECK (amount > 0),
    currency VARCHAR(3) NOT NULL,
    transaction_date DATE NOT NULL,
    description TEXT NOT NULL,
    category_id UUID,
    related_invoice_id UUID,
    related_expense_id UUID,
    related_income_id UUID,
    reconciled BOOLEAN NOT NULL DEFAULT FALSE,
    soft_delete BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Live transactions per account, for balance recomputation
CREATE INDEX idx_transactions_account ON transactions(account_id) WHERE soft_delete = FALSE;

-- Company-scoped listing by date
CREATE INDEX idx_transactions_company_date
    ON transactions(company_id, transaction_date DESC) WHERE soft_delete = FALSE;
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    client_id UUID NOT NULL REFERENCES clients(id),
    invoice_number VARCHAR(32) NOT NULL,
    status invoice_status NOT NULL DEFAULT 'draft',
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    subtotal DECIMAL(19, 4) NOT NULL DEFAULT 0,
    tax_total DECIMAL(19, 4) NOT NULL DEFAULT 0,
    total DECIMAL(19, 4) NOT NULL DEFAULT 0,
    currency VARCHAR(3) NOT NULL,
    notes TEXT,
    recurring recurring_frequency NOT NULL DEFAULT 'none',
    next_due_date DATE,
    category_id UUID,
    soft_delete BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoices_recurring_due_date
        CHECK (recurring = 'none' OR next_due_date IS NOT NULL)
);

-- Backstop for number generation: unique per company
CREATE UNIQUE INDEX idx_invoices_company_number ON invoices(company_id, invoice_number);

-- Scheduler scan: due recurring invoices
CREATE INDEX idx_invoices_recurring_due
    ON invoices(next_due_date) WHERE recurring <> 'none' AND soft_delete = FALSE;

CREATE INDEX idx_invoices_company ON invoices(company_id) WHERE soft_delete = FALSE;
";

const INVOICE_ITEMS_SQL: &str = r"
CREATE TABLE invoice_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    quantity DECIMAL(19, 4) NOT NULL,
    unit_price DECIMAL(19, 4) NOT NULL,
    amount DECIMAL(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_invoice_items_invoice ON invoice_items(invoice_id);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    vendor_name VARCHAR(255),
    description TEXT NOT NULL,
    amount DECIMAL(19, 4) NOT NULL,
    currency VARCHAR(3) NOT NULL,
    expense_date DATE NOT NULL,
    status expense_status NOT NULL DEFAULT 'pending',
    category_id UUID,
    recurring recurring_frequency NOT NULL DEFAULT 'none',
    next_due_date DATE,
    soft_delete BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_expenses_recurring_due_date
        CHECK (recurring = 'none' OR next_due_date IS NOT NULL)
);

CREATE INDEX idx_expenses_recurring_due
    ON expenses(next_due_date) WHERE recurring <> 'none' AND soft_delete = FALSE;

CREATE INDEX idx_expenses_company ON expenses(company_id) WHERE soft_delete = FALSE;
";

const INCOME_SQL: &str = r"
CREATE TABLE income (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    source VARCHAR(255),
    description TEXT NOT NULL,
    amount DECIMAL(19, 4) NOT NULL,
    currency VARCHAR(3) NOT NULL,
    income_date DATE NOT NULL,
    status income_status NOT NULL DEFAULT 'pending',
    category_id UUID,
    recurring recurring_frequency NOT NULL DEFAULT 'none',
    next_due_date DATE,
    soft_delete BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_income_recurring_due_date
        CHECK (recurring = 'none' OR next_due_date IS NOT NULL)
);

CREATE INDEX idx_income_recurring_due
    ON income(next_due_date) WHERE recurring <> 'none' AND soft_delete = FALSE;

CREATE INDEX idx_income_company ON income(company_id) WHERE soft_delete = FALSE;
";

const QUOTES_SQL: &str = r"
CREATE TABLE quotes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    client_id UUID NOT NULL REFERENCES clients(id),
    quote_number VARCHAR(32) NOT NULL,
    status quote_status NOT NULL DEFAULT 'draft',
    issue_date DATE NOT NULL,
    valid_until DATE,
    subtotal DECIMAL(19, 4) NOT NULL DEFAULT 0,
    tax_total DECIMAL(19, 4) NOT NULL DEFAULT 0,
    total DECIMAL(19, 4) NOT NULL DEFAULT 0,
    currency VARCHAR(3) NOT NULL,
    notes TEXT,
    converted_to_invoice_id UUID REFERENCES invoices(id),
    soft_delete BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_quotes_company_number ON quotes(company_id, quote_number);

CREATE INDEX idx_quotes_company ON quotes(company_id) WHERE soft_delete = FALSE;
";

const QUOTE_ITEMS_SQL: &str = r"
CREATE TABLE quote_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    quote_id UUID NOT NULL REFERENCES quotes(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    quantity DECIMAL(19, 4) NOT NULL,
    unit_price DECIMAL(19, 4) NOT NULL,
    amount DECIMAL(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_quote_items_quote ON quote_items(quote_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS quote_items CASCADE;
DROP TABLE IF EXISTS quotes CASCADE;
DROP TABLE IF EXISTS income CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS invoice_items CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TABLE IF EXISTS api_tokens CASCADE;
DROP TABLE IF EXISTS companies CASCADE;

DROP TYPE IF EXISTS quote_status;
DROP TYPE IF EXISTS income_status;
DROP TYPE IF EXISTS expense_status;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS recurring_frequency;
DROP TYPE IF EXISTS entry_kind;
DROP TYPE IF EXISTS account_kind;
";
