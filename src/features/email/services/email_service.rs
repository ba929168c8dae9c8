use std::error::Error as StdError;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use minijinja::{context, Value};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::admin::models::AdminSettings;
use crate::features::admin::services::SettingsService;
use crate::features::email::dtos::{EmailSendResultDto, SendReportDto, SendTestEmailDto};
use crate::features::email::templates;
use crate::shared::validation::is_valid_email;

const CONFIG_INCOMPLETE: &str =
    "SMTP configuration not complete. Please configure email settings in Admin Settings.";

/// Fine joined with its recipient, for the receipt email.
#[derive(Debug, sqlx::FromRow)]
struct ReceiptRow {
    amount: f64,
    reason: String,
    notes: String,
    fine_date: DateTime<Utc>,
    employee: String,
    employee_code: String,
    employee_email: String,
    violation_name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ReportFineRow {
    amount: f64,
    reason: String,
    fine_date: DateTime<Utc>,
    violation_name: String,
}

#[derive(Debug, Serialize)]
struct ReportTableRow {
    date: String,
    violation: String,
    reason: String,
    amount: String,
}

pub struct EmailService {
    pool: SqlitePool,
    settings: Arc<SettingsService>,
}

impl EmailService {
    pub fn new(pool: SqlitePool, settings: Arc<SettingsService>) -> Self {
        Self { pool, settings }
    }

    /// Receipt for one fine, sent to the fined employee.
    pub async fn send_receipt(&self, fine_id: i64) -> Result<EmailSendResultDto> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            "SELECT f.amount, f.reason, f.notes, f.fine_date, \
                 e.name AS employee, e.employee_code, e.email AS employee_email, \
                 COALESCE(v.name, 'Unknown') AS violation_name \
             FROM fines f \
             JOIN employees e ON e.id = f.employee_id \
             LEFT JOIN violation_types v ON v.id = f.violation_type_id \
             WHERE f.id = ?",
        )
        .bind(fine_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Fine not found".to_string()))?;

        if row.employee_email.trim().is_empty() {
            return Err(AppError::Validation("Employee email not found".to_string()));
        }

        let settings = self.smtp_settings().await?;
        let html = templates::render(
            templates::RECEIPT,
            context! {
                company_name => display_company(&settings),
                receipt_date => format_date(Utc::now()),
                employee => row.employee,
                employee_code => or_na(&row.employee_code),
                violation => row.violation_name,
                fine_date => format_date(row.fine_date),
                reason => row.reason,
                notes => row.notes,
                amount => format!("{:.2}", row.amount),
                signature => settings.email_signature.clone(),
                admin_email => or_admin(&settings.admin_email),
            },
        )?;

        let subject = format!("Fine Receipt - {}", row.violation_name);
        let reply = self
            .transmit(&settings, &row.employee_email, &subject, html)
            .await?;

        Ok(EmailSendResultDto {
            message: format!("Receipt sent successfully to {}", row.employee_email),
            message_id: reply,
        })
    }

    /// Aggregate fine report for one employee.
    pub async fn send_employee_report(&self, dto: SendReportDto) -> Result<EmailSendResultDto> {
        let employee_id = dto
            .employee_id
            .ok_or_else(|| AppError::Validation("Employee is required".to_string()))?;

        let employee = sqlx::query_as::<_, (String, String, String, String)>(
            "SELECT name, department, employee_code, email FROM employees WHERE id = ?",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
        let (name, department, employee_code, email) = employee;

        if email.trim().is_empty() {
            return Err(AppError::Validation("Employee email not found".to_string()));
        }

        let fines = sqlx::query_as::<_, ReportFineRow>(
            "SELECT f.amount, f.reason, f.fine_date, \
                 COALESCE(v.name, 'Unknown') AS violation_name \
             FROM fines f \
             LEFT JOIN violation_types v ON v.id = f.violation_type_id \
             WHERE f.employee_id = ? \
             ORDER BY f.fine_date DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        let total: f64 = fines.iter().map(|f| f.amount).sum();
        let rows: Vec<ReportTableRow> = fines
            .iter()
            .map(|f| ReportTableRow {
                date: format_date(f.fine_date),
                violation: f.violation_name.clone(),
                reason: f.reason.clone(),
                amount: format!("{:.2}", f.amount),
            })
            .collect();

        let settings = self.smtp_settings().await?;
        let html = templates::render(
            templates::REPORT,
            context! {
                company_name => display_company(&settings),
                report_date => format_date(Utc::now()),
                employee => name.clone(),
                employee_code => or_na(&employee_code),
                department => or_na(&department),
                fine_count => fines.len(),
                total_amount => format!("{:.2}", total),
                fines => Value::from_serialize(&rows),
                signature => settings.email_signature.clone(),
                admin_email => or_admin(&settings.admin_email),
            },
        )?;

        let subject = format!("Fine Report for {}", name);
        let reply = self.transmit(&settings, &email, &subject, html).await?;

        Ok(EmailSendResultDto {
            message: format!("Employee report sent successfully to {}", email),
            message_id: reply,
        })
    }

    /// Configuration check: exercises the full pipeline against a caller-
    /// supplied address.
    pub async fn send_test_email(&self, dto: SendTestEmailDto) -> Result<EmailSendResultDto> {
        let to = dto
            .test_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Test email address is required".to_string()))?
            .to_string();
        if !is_valid_email(&to) {
            return Err(AppError::Validation("Invalid email address format".to_string()));
        }

        let settings = self.smtp_settings().await?;
        let now = Utc::now();
        let html = templates::render(
            templates::TEST,
            context! {
                company_name => display_company(&settings),
                test_date => format_date(now),
                test_time => now.format("%H:%M:%S UTC").to_string(),
                smtp_server => settings.smtp_server.clone(),
                smtp_port => settings.smtp_port,
                smtp_username => settings.smtp_username.clone(),
                signature => settings.email_signature.clone(),
            },
        )?;

        let subject = format!("Email Configuration Test - {}", display_company(&settings));
        let reply = self.transmit(&settings, &to, &subject, html).await?;

        Ok(EmailSendResultDto {
            message: format!("Test email sent successfully to {}", to),
            message_id: reply,
        })
    }

    /// Loads settings and rejects before any network traffic when the SMTP
    /// fields are not all present.
    async fn smtp_settings(&self) -> Result<AdminSettings> {
        let settings = self.settings.load().await?;
        if settings.smtp_server.trim().is_empty()
            || settings.smtp_username.trim().is_empty()
            || settings.smtp_password.trim().is_empty()
        {
            return Err(AppError::EmailConfig(CONFIG_INCOMPLETE.to_string()));
        }
        Ok(settings)
    }

    /// Verify the connection, then send. Both steps classify their transport
    /// errors into the config/auth/host/connection taxonomy.
    async fn transmit(
        &self,
        settings: &AdminSettings,
        to: &str,
        subject: &str,
        html: String,
    ) -> Result<String> {
        let transport = build_transport(settings)?;

        let verified = transport.test_connection().await.map_err(classify)?;
        if !verified {
            return Err(AppError::EmailConnection(
                "SMTP server rejected the connection check".to_string(),
            ));
        }

        let from = sender_mailbox(settings)?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|_| AppError::Validation("Invalid email address format".to_string()))?;
        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let response = transport.send(message).await.map_err(classify)?;
        tracing::info!("Email sent to {}: {}", to, response.code());
        Ok(response.code().to_string())
    }
}

fn build_transport(settings: &AdminSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    let port = u16::try_from(settings.smtp_port).unwrap_or(587);
    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)
        .map_err(classify)?
        .port(port)
        .credentials(Credentials::new(
            settings.smtp_username.clone(),
            settings.smtp_password.clone(),
        ))
        .build();
    Ok(transport)
}

fn sender_mailbox(settings: &AdminSettings) -> Result<Mailbox> {
    format!("\"{}\" <{}>", display_company(settings), settings.smtp_username)
        .parse()
        .or_else(|_| settings.smtp_username.parse())
        .map_err(|_| {
            AppError::EmailConfig("SMTP username is not a valid email address".to_string())
        })
}

/// Maps a lettre transport error onto the taxonomy: permanent auth rejections
/// (535/534/530), unreachable hosts, refused/timed-out connections, and
/// everything else as a generic send failure.
fn classify(err: lettre::transport::smtp::Error) -> AppError {
    let text = err.to_string();

    if let Some(code) = err.status() {
        let code = code.to_string();
        if code.starts_with("535") || code.starts_with("534") || code.starts_with("530") {
            return AppError::EmailAuth(text);
        }
    }

    // Walk the source chain for the underlying socket error.
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            return match io.kind() {
                std::io::ErrorKind::ConnectionRefused
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::TimedOut => AppError::EmailConnection(text),
                _ => AppError::EmailHost(text),
            };
        }
        source = inner.source();
    }

    let lower = text.to_lowercase();
    if lower.contains("resolve") || lower.contains("dns") || lower.contains("lookup") {
        return AppError::EmailHost(text);
    }
    if lower.contains("connection") || lower.contains("timed out") {
        return AppError::EmailConnection(text);
    }
    AppError::EmailSend(text)
}

fn format_date(when: DateTime<Utc>) -> String {
    when.format("%m/%d/%Y").to_string()
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

fn or_admin(value: &str) -> String {
    if value.trim().is_empty() {
        "admin".to_string()
    } else {
        value.to_string()
    }
}

fn display_company(settings: &AdminSettings) -> String {
    if settings.company_name.trim().is_empty() {
        "Fine Management".to_string()
    } else {
        settings.company_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{insert_employee, test_pool};

    async fn service() -> EmailService {
        let pool = test_pool().await;
        let settings = Arc::new(SettingsService::new(pool.clone()));
        EmailService::new(pool, settings)
    }

    #[tokio::test]
    async fn test_incomplete_config_fails_before_any_network_use() {
        // Seeded settings have empty smtp_server/username/password, so the
        // gate must trip without a transport ever being built.
        let service = service().await;
        let emp = insert_employee(&service.pool, "Ann Lee").await;
        sqlx::query("UPDATE employees SET email = 'ann@company.com' WHERE id = ?")
            .bind(emp)
            .execute(&service.pool)
            .await
            .unwrap();

        let err = service
            .send_employee_report(SendReportDto {
                employee_id: Some(emp),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailConfig(ref m) if m == CONFIG_INCOMPLETE));
    }

    #[tokio::test]
    async fn test_test_email_requires_smtp_password() {
        // Server and username alone are not enough; a blank password still
        // trips the gate before any transport is built.
        let service = service().await;
        sqlx::query(
            "UPDATE admin_settings SET smtp_server = 'smtp.gmail.com', \
             smtp_username = 'fines@company.com' WHERE id = 1",
        )
        .execute(&service.pool)
        .await
        .unwrap();

        let err = service
            .send_test_email(SendTestEmailDto {
                test_email: Some("ann@company.com".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailConfig(ref m) if m == CONFIG_INCOMPLETE));
    }

    #[tokio::test]
    async fn test_test_email_address_validation() {
        let service = service().await;

        let err = service
            .send_test_email(SendTestEmailDto { test_email: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Test email address is required"));

        let err = service
            .send_test_email(SendTestEmailDto {
                test_email: Some("not-an-address".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid email address format"));
    }

    #[tokio::test]
    async fn test_receipt_requires_employee_email() {
        let service = service().await;
        let emp = insert_employee(&service.pool, "Ann Lee").await;
        let vt = crate::shared::test_helpers::insert_violation_type(
            &service.pool,
            "Late Arrival",
            25.0,
        )
        .await;
        let fine = crate::shared::test_helpers::insert_fine(&service.pool, emp, vt, 25.0, "late")
            .await;

        let err = service.send_receipt(fine).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Employee email not found"));

        let err = service.send_receipt(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
