use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "lama-comparator",
    version,
    about = "Product comparison endpoint (AWS Lambda) with a local one-off mode"
)]
pub struct Cli {
    /// Directory holding the catalog and review texts (overrides LAMA_DATA_DIR)
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<String>,

    /// Run a single local invocation with this mode instead of the Lambda runtime
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<String>,

    /// First product identifier
    #[arg(short = 'a', long = "asin-a")]
    pub asin_a: Option<String>,

    /// Second product identifier
    #[arg(short = 'b', long = "asin-b")]
    pub asin_b: Option<String>,

    /// Language code for review texts and generated output
    #[arg(short = 'l', long = "lang")]
    pub lang: Option<String>,

    /// Return full records in index mode
    #[arg(long = "full")]
    pub full: bool,

    /// Fail metrics requests when the analysis cannot be generated
    #[arg(long = "strict-metrics")]
    pub strict_metrics: bool,
}

impl Cli {
    /// Query parameters for the local invocation, using the same names as the HTTP API.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(mode) = &self.mode {
            pairs.push(("mode", mode.clone()));
        }
        if let Some(asin) = &self.asin_a {
            pairs.push(("asinA", asin.clone()));
        }
        if let Some(asin) = &self.asin_b {
            pairs.push(("asinB", asin.clone()));
        }
        if let Some(lang) = &self.lang {
            pairs.push(("lang", lang.clone()));
        }
        if self.full {
            pairs.push(("full", "true".to_string()));
        }
        pairs
    }
}
