//! Contact-page demo for formforge.
//!
//! Seeds an in-memory store with a contact form definition and a stored
//! response-template pairing, then serves three routes:
//!
//! - `/` redirects to the contact page
//! - `/contact/` shows the assembled form; a valid submission renders the
//!   inline thank-you template and redirects back
//! - `/pages/{pk}/` drives the same flow from the stored pairing
//!
//! ## Running
//!
//! ```bash
//! cargo run --package contact-demo
//! # or with a settings file:
//! cargo run --package contact-demo -- --settings contact.toml
//! ```

mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use formforge_core::logging::setup_logging;
use formforge_core::{ForgeResult, Settings};
use formforge_template::Engine;
use formforge_views::{App, FormTemplateView, ModelFormTemplateView, RedirectView};

#[derive(Parser, Debug)]
#[command(
    name = "contact-demo",
    about = "Serve the formforge contact-page demo",
    version
)]
struct Args {
    /// Address to bind the development server to
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,

    /// Settings TOML file; built-in defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::from_toml_file_with_env(path)?,
        None => Settings::default(),
    };
    setup_logging(&settings);

    let engine = Arc::new(build_engine()?);
    let site = seed::sample_site()?;
    tracing::info!(
        form = %site.entry_slug,
        pairing = site.record_id,
        "seeded demo store"
    );

    let contact = FormTemplateView::new(site.store.clone(), site.entry_id)
        .with_engine(Arc::clone(&engine))
        .with_page_template("contact.html")
        .with_context("headline", serde_json::json!("Contact us"))
        .with_template_string(
            "Thanks {{ name }}! Your {{ topic }} question is on its way to the team. \
             We will reply to {{ email }}.",
        )
        .with_success_url("/contact/");

    let pages = ModelFormTemplateView::new(site.store.clone())
        .with_engine(Arc::clone(&engine))
        .with_page_template("contact.html")
        .with_success_url("/contact/");

    let app = App::new(settings)
        .engine(engine)
        .route("/", Arc::new(RedirectView::new("/contact/")))
        .route("/contact/", Arc::new(contact))
        .route("/pages/{pk}/", Arc::new(pages));

    app.run(&args.addr).await?;
    Ok(())
}

/// Register the page templates the demo renders.
fn build_engine() -> ForgeResult<Engine> {
    let engine = Engine::new();

    engine.add_string_template(
        "base.html",
        r#"<!DOCTYPE html>
<html>
<head><title>formforge demo</title></head>
<body>
<nav><a href="/contact/">Contact</a></nav>
{% block content %}{% endblock %}
</body>
</html>"#,
    )?;

    engine.add_string_template(
        "contact.html",
        r#"{% extends "base.html" %}
{% block content %}
<h1>{{ headline | default(value="Write to us") }}</h1>
<form method="post">
{% for field in form.fields %}<p>{{ field.label_tag | safe }} {{ field.html | safe }}
{% for error in field.errors %}<span class="error">{{ error }}</span>{% endfor %}</p>
{% endfor %}<button type="submit">Send</button>
</form>
{% endblock %}"#,
    )?;

    Ok(engine)
}
