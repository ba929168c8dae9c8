//! Email HTML templates, embedded at compile time and rendered with
//! minijinja.

use std::sync::OnceLock;

use minijinja::{Environment, Value};

use crate::core::error::{AppError, Result};

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

pub const RECEIPT: &str = "receipt.html";
pub const REPORT: &str = "report.html";
pub const TEST: &str = "test.html";

fn environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        // Embedded templates with valid syntax cannot fail to register.
        env.add_template(RECEIPT, include_str!("../../../templates/email/receipt.html.jinja"))
            .expect("receipt template is valid");
        env.add_template(REPORT, include_str!("../../../templates/email/report.html.jinja"))
            .expect("report template is valid");
        env.add_template(TEST, include_str!("../../../templates/email/test.html.jinja"))
            .expect("test template is valid");
        env
    })
}

pub fn render(template_name: &str, ctx: Value) -> Result<String> {
    let template = environment().get_template(template_name).map_err(|e| {
        tracing::error!("Email template {} missing: {}", template_name, e);
        AppError::Internal("Failed to generate email content".to_string())
    })?;
    template.render(ctx).map_err(|e| {
        tracing::error!("Email template {} failed to render: {}", template_name, e);
        AppError::Internal("Failed to generate email content".to_string())
    })
}
