use clap::Parser;
use miette::{IntoDiagnostic, Result};
use phonepe_checkout::application::checkout::CheckoutInitiator;
use phonepe_checkout::domain::checkout::{AuthenticatedUser, BillingCycle};
use phonepe_checkout::domain::ports::PaymentGatewayBox;
use phonepe_checkout::infrastructure::clock::SystemClock;
use phonepe_checkout::infrastructure::sandbox::SandboxGateway;
use phonepe_checkout::infrastructure::supabase::{SupabaseConfig, SupabaseFunctionGateway};
use phonepe_checkout::interfaces::console::ConsoleRedirector;
use phonepe_checkout::interfaces::csv::plan_reader::PlanReader;
use reqwest::Url;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subscription plans CSV file
    plans: PathBuf,

    /// Slug of the plan to pay for
    #[arg(long)]
    plan: String,

    /// Billing cycle: monthly or annual
    #[arg(long, default_value = "monthly")]
    cycle: BillingCycle,

    /// Signed-in user id. Checkout is refused without one.
    #[arg(long, env = "CHECKOUT_USER_ID")]
    user: Option<String>,

    /// The user already holds a subscription and gets regular pricing.
    #[arg(long)]
    existing_subscriber: bool,

    /// Origin the payment gateway redirects back to.
    #[arg(long, env = "APP_ORIGIN", default_value = "http://localhost:8080")]
    app_origin: Url,

    /// Supabase project URL. Without it the PhonePe sandbox is used.
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<Url>,

    #[arg(long, env = "SUPABASE_ANON_KEY", default_value = "")]
    supabase_anon_key: String,

    /// Server-to-server callback passed to the sandbox pay page.
    #[arg(long, env = "PHONEPE_CALLBACK_URL")]
    callback_url: Option<Url>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "phonepe_checkout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load plan catalog
    let file = File::open(&cli.plans).into_diagnostic()?;
    let catalog = PlanReader::new(file).into_catalog().await.into_diagnostic()?;
    let user = cli.user.as_deref().and_then(AuthenticatedUser::from_id);
    if cli.existing_subscriber
        && let Some(user) = &user
    {
        catalog.record_subscriber(user.id.clone()).await;
    }

    let gateway: PaymentGatewayBox = if let Some(url) = cli.supabase_url {
        let config = SupabaseConfig {
            url,
            anon_key: cli.supabase_anon_key,
        };
        Box::new(SupabaseFunctionGateway::new(config).into_diagnostic()?)
    } else {
        eprintln!(
            "WARNING: No Supabase URL configured. Falling back to the PhonePe sandbox gateway."
        );
        let mut sandbox = SandboxGateway::phonepe_uat().into_diagnostic()?;
        if let Some(callback_url) = cli.callback_url {
            sandbox = sandbox.with_callback_url(callback_url);
        }
        Box::new(sandbox)
    };

    let initiator = CheckoutInitiator::new(
        Box::new(catalog),
        gateway,
        Box::new(ConsoleRedirector::stdout()),
        Box::new(SystemClock),
        cli.app_origin,
    )
    .with_error_callback(|message| eprintln!("Checkout failed: {}", message));

    if initiator
        .initiate(user.as_ref(), &cli.plan, cli.cycle)
        .await
        .is_err()
    {
        // Already reported through the error callback
        std::process::exit(1);
    }

    Ok(())
}
