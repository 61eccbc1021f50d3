use anyhow::{Context, bail};
use catalog_client::CatalogClient;
use checkout_engine::{
    CheckoutFlow, Handoff, LocalStore, PaymentOutcome, PersistedState, Route, TextReceiptSink,
    money::format_amount, setup_environment,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 配置, 日志)
    let config = setup_environment();
    tracing::info!(work_dir = %config.work_dir, catalog = %config.catalog_url, "Checkout engine starting...");

    // 2. 本地存储
    let store = LocalStore::open(config.store_path()).context("open local store")?;
    let state = PersistedState::new(Arc::new(store));
    let mut flow = CheckoutFlow::new(state, &config);

    let mut client = CatalogClient::new(&config.client_config())?;

    // 3. 登录 (已有 token 时跳过)
    if flow.route() == Route::Login {
        let username = std::env::var("CHECKOUT_USERNAME").unwrap_or_else(|_| "emilys".into());
        let password = std::env::var("CHECKOUT_PASSWORD").unwrap_or_else(|_| "emilyspass".into());
        let response = client.login(&username, &password).await?;
        if flow.login(&response) != Route::Browse {
            bail!("login response carried no token");
        }
    }
    if let Some(token) = flow.auth().token() {
        client = client.with_token(token);
    }
    if let Some(name) = flow.auth().display_name() {
        tracing::info!(user = %name, "Signed in");
    }

    // 4. 目录第一页
    flow.load_page(&client, 1).await;
    if let Some(error) = flow.pager().error() {
        bail!("{error}");
    }
    let Some(first) = flow.pager().items().first().map(|p| p.id) else {
        bail!("catalog is empty");
    };
    flow.add_from_catalog(first);

    // 5. 核对并支付
    if flow.proceed_to_review() != Route::Review {
        bail!("nothing to review");
    }
    if let Some(session) = flow.session_mut() {
        tracing::info!(
            reference = %session.reference(),
            total = %format_amount(session.total(), &config.currency),
            "Reviewing"
        );
        session.pad_mut().fill("123456");
    }

    match flow.attempt_payment()? {
        PaymentOutcome::InsufficientFunds { balance, required } => {
            tracing::warn!(
                balance = %format_amount(balance, &config.currency),
                required = %format_amount(required, &config.currency),
                "Insufficient funds"
            );
            flow.back_to_browse();
            return Ok(());
        }
        outcome => tracing::info!(?outcome, "Payment processed"),
    }

    // 6. 收据
    let mut sink = TextReceiptSink::new(std::io::stdout(), config.currency.clone());
    if let Handoff::Fallback(artifact) = flow.show_receipt(&mut sink, &config.currency)? {
        let path = artifact.save_to(config.receipts_dir())?;
        tracing::info!(path = %path.display(), "Receipt saved");
    }
    flow.finish_payment();

    tracing::info!(
        balance = %format_amount(flow.wallet_balance(), &config.currency),
        "Done"
    );
    Ok(())
}
