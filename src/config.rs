use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,

    // Stripe API (checkout sessions)
    pub stripe_secret: String,
    pub stripe_api_base: String,
    pub stripe_success_url: String,
    pub stripe_cancel_url: String,

    // Stripe webhooks
    pub stripe_endpoint_secret: String,

    // Internal event bus
    pub redis_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source. `from_env` is the
    /// process-environment case.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| var(key).with_context(|| format!("{} required", key));

        let config = Self {
            environment: Self::parse_environment(
                &var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            )?,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "3003".to_string())
                .parse()
                .context("Invalid PORT")?,

            stripe_secret: required("STRIPE_SECRET")?,
            stripe_api_base: var("STRIPE_API_BASE")
                .unwrap_or_else(|| "https://api.stripe.com".to_string()),
            stripe_success_url: required("STRIPE_SUCCESS_URL")?,
            stripe_cancel_url: required("STRIPE_CANCEL_URL")?,

            stripe_endpoint_secret: required("STRIPE_ENDPOINT_SECRET")?,

            redis_url: var("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_environment(env: &str) -> Result<Environment> {
        match env.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => bail!("Unknown environment: {}", env),
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("STRIPE_API_BASE", &self.stripe_api_base),
            ("STRIPE_SUCCESS_URL", &self.stripe_success_url),
            ("STRIPE_CANCEL_URL", &self.stripe_cancel_url),
        ] {
            if !url.starts_with("http") {
                bail!("{} must be HTTP(S) URL", name);
            }
        }

        // The signing secret (whsec_...) is issued per webhook endpoint and is
        // not interchangeable with the API key.
        if self.stripe_endpoint_secret == self.stripe_secret {
            bail!("STRIPE_ENDPOINT_SECRET must differ from STRIPE_SECRET");
        }

        tracing::info!(
            "Configuration validated for {:?} environment",
            self.environment
        );

        Ok(())
    }
}
