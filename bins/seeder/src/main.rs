//! Database seeder for Daftar development and testing.
//!
//! Seeds a demo tenant with one accountant, a fiscal year covering the
//! current calendar year, the standard Egyptian chart of accounts and a
//! posted opening entry, then prints a development access token.
//! Re-running is safe: existing rows are reused.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use daftar_core::ledger::JournalLineInput;
use daftar_db::repositories::{
    AccountFilter, AccountRepository, CreateDraftInput, CreateFiscalYearInput, CreateTenantInput,
    CreateUserInput, FiscalRepository, JournalRepository, TenantRepository,
};
use daftar_shared::types::{TenantId, UserId};
use daftar_shared::{AppConfig, JwtConfig, JwtService, TenantContext};

const DEMO_SLUG: &str = "demo";
const DEMO_EMAIL: &str = "accountant@demo.daftar.dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let today = Utc::now().with_timezone(&config.ledger.tz()?).date_naive();

    println!("Connecting to database...");
    let db = daftar_db::connect_with(&config.database).await?;

    println!("Seeding demo tenant...");
    let (tenant_id, user_id) = seed_tenant(&db).await?;

    println!("Seeding fiscal year...");
    let fiscal_year_created = seed_fiscal_year(&db, tenant_id, today).await?;

    println!("Seeding standard chart of accounts...");
    let inserted = AccountRepository::new(db.clone())
        .seed_standard_chart(tenant_id)
        .await?;
    println!("  Inserted {inserted} accounts");

    if fiscal_year_created {
        println!("Posting opening entry...");
        seed_opening_entry(&db, TenantContext::new(tenant_id, user_id), today).await?;
    }

    let jwt = JwtService::new(JwtConfig::from(&config.jwt));
    let token =
        jwt.generate_access_token(user_id.into_inner(), tenant_id.into_inner(), "accountant")?;

    println!("Seeding complete!");
    println!("  Tenant:  {tenant_id}");
    println!("  User:    {DEMO_EMAIL} ({user_id})");
    println!("  Token:   {token}");
    Ok(())
}

/// Finds or creates the demo tenant and its accountant.
async fn seed_tenant(db: &DatabaseConnection) -> anyhow::Result<(TenantId, UserId)> {
    let tenants = TenantRepository::new(db.clone());

    let tenant = if let Some(existing) = tenants.find_by_slug(DEMO_SLUG).await? {
        println!("  Demo tenant already exists, skipping...");
        existing
    } else {
        tenants
            .create_tenant(CreateTenantInput {
                name: "Demo Trading Co.".to_string(),
                slug: DEMO_SLUG.to_string(),
            })
            .await?
    };
    let tenant_id = TenantId::from_uuid(tenant.id);

    let user = if let Some(existing) = tenants.find_user_by_email(DEMO_EMAIL).await? {
        existing
    } else {
        tenants
            .create_user(CreateUserInput {
                tenant_id: Some(tenant_id),
                email: DEMO_EMAIL.to_string(),
                full_name: "Demo Accountant".to_string(),
                role: "accountant".to_string(),
                is_platform_admin: false,
            })
            .await?
    };

    Ok((tenant_id, UserId::from_uuid(user.id)))
}

/// Creates the calendar year containing `today` unless a current year exists.
///
/// Returns true when a year was created.
async fn seed_fiscal_year(
    db: &DatabaseConnection,
    tenant_id: TenantId,
    today: NaiveDate,
) -> anyhow::Result<bool> {
    let fiscal = FiscalRepository::new(db.clone());

    if let Some(current) = fiscal.current_fiscal_year(tenant_id, today).await? {
        println!("  Fiscal year {} already covers {today}, skipping...", current.name);
        return Ok(false);
    }

    let year = today.year();
    let start_date = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid start of year {year}"))?;
    let end_date = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| anyhow::anyhow!("invalid end of year {year}"))?;

    let created = fiscal
        .create_fiscal_year(
            tenant_id,
            CreateFiscalYearInput {
                name: format!("FY{year}"),
                start_date,
                end_date,
            },
        )
        .await?;
    println!("  Created {} ({start_date} to {end_date})", created.name);
    Ok(true)
}

/// Posts the owners' capital contribution into the bank account.
async fn seed_opening_entry(
    db: &DatabaseConnection,
    ctx: TenantContext,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let accounts = AccountRepository::new(db.clone())
        .list_accounts(ctx.tenant_id, AccountFilter::default())
        .await?;
    let id_of = |code: &str| {
        accounts
            .iter()
            .find(|a| a.code == code)
            .map(|a| a.id)
            .ok_or_else(|| anyhow::anyhow!("standard account {code} missing"))
    };

    let capital = Decimal::new(25_000_000, 2);
    let journal = JournalRepository::new(db.clone());
    let draft = journal
        .create_draft(
            &ctx,
            CreateDraftInput {
                entry_date: today,
                description: Some("Opening capital contribution".to_string()),
                reference: Some("OPEN-1".to_string()),
                lines: vec![
                    JournalLineInput::debit(id_of("1102")?, capital),
                    JournalLineInput::credit(id_of("3101")?, capital),
                ],
            },
        )
        .await?;
    let posted = journal.post(&ctx, draft.entry.id).await?;
    println!("  Posted {}", posted.entry.entry_number);
    Ok(())
}
