//! Startup schema migration.
//!
//! Every statement is idempotent so the migration runs on each boot.

use sqlx::PgPool;

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS bank_accounts (
    id          BIGSERIAL PRIMARY KEY,
    user_id     BIGINT         NOT NULL,
    owner       TEXT           NOT NULL,
    account_no  TEXT           NOT NULL UNIQUE,
    bank_name   TEXT           NOT NULL,
    balance     NUMERIC(20, 2) NOT NULL DEFAULT 0 CHECK (balance >= 0)
)
"#;

const CREATE_ACCOUNTS_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bank_accounts_user_id ON bank_accounts (user_id)";

const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id               BIGSERIAL PRIMARY KEY,
    user_id          BIGINT         NOT NULL,
    from_account_id  BIGINT         NOT NULL,
    to_account_id    BIGINT         NOT NULL,
    amount           NUMERIC(20, 2) NOT NULL CHECK (amount > 0),
    currency         VARCHAR(3)     NOT NULL,
    created_at       TIMESTAMPTZ    NOT NULL DEFAULT NOW()
)
"#;

const CREATE_TRANSACTIONS_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_transactions_user_id ON transactions (user_id)";

/// Create tables and indexes if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing PostgreSQL schema...");

    for statement in [
        CREATE_ACCOUNTS_TABLE,
        CREATE_ACCOUNTS_USER_INDEX,
        CREATE_TRANSACTIONS_TABLE,
        CREATE_TRANSACTIONS_USER_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("PostgreSQL schema ready");
    Ok(())
}
