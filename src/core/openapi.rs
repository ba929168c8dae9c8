use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::core::error::ErrorBody;
use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::email::{dtos as email_dtos, handlers as email_handlers};
use crate::features::employees::{dtos as employee_dtos, handlers as employee_handlers};
use crate::features::fines::{dtos as fine_dtos, handlers as fine_handlers};
use crate::features::violations::{
    dtos as violation_dtos, handlers as violation_handlers, models as violation_models,
};
use crate::shared::types::{ApiResponse, StatusMessage};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::check,
        auth_handlers::change_password,
        // Employees
        employee_handlers::list_employees,
        employee_handlers::get_employee,
        employee_handlers::create_employee,
        employee_handlers::update_employee,
        employee_handlers::delete_employee,
        employee_handlers::employee_totals,
        // Violation types
        violation_handlers::list_violation_types,
        violation_handlers::get_violation_type,
        violation_handlers::create_violation_type,
        violation_handlers::update_violation_type,
        violation_handlers::delete_violation_type,
        // Fines
        fine_handlers::list_fines,
        fine_handlers::get_fine,
        fine_handlers::create_fine,
        fine_handlers::update_fine,
        fine_handlers::delete_fine,
        // Admin settings
        admin_handlers::get_settings,
        admin_handlers::update_settings,
        // Email
        email_handlers::send_receipt,
        email_handlers::send_employee_report,
        email_handlers::send_test_email,
        // Dashboard
        dashboard_handlers::dashboard_stats,
    ),
    components(
        schemas(
            // Shared
            StatusMessage,
            ErrorBody,
            // Auth
            auth_model::Role,
            auth_model::AuthenticatedUser,
            auth_dtos::LoginDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::AuthCheckDto,
            auth_dtos::ChangePasswordDto,
            ApiResponse<auth_dtos::LoginResponseDto>,
            ApiResponse<auth_dtos::AuthCheckDto>,
            // Employees
            employee_dtos::EmployeeResponseDto,
            employee_dtos::SaveEmployeeDto,
            employee_dtos::EmployeeTotalsDto,
            ApiResponse<Vec<employee_dtos::EmployeeResponseDto>>,
            ApiResponse<employee_dtos::EmployeeResponseDto>,
            ApiResponse<Vec<employee_dtos::EmployeeTotalsDto>>,
            // Violation types
            violation_models::Severity,
            violation_dtos::ViolationTypeResponseDto,
            violation_dtos::SaveViolationTypeDto,
            violation_dtos::SuggestionsInput,
            ApiResponse<Vec<violation_dtos::ViolationTypeResponseDto>>,
            ApiResponse<violation_dtos::ViolationTypeResponseDto>,
            // Fines
            fine_dtos::FineResponseDto,
            fine_dtos::SaveFineDto,
            ApiResponse<Vec<fine_dtos::FineResponseDto>>,
            ApiResponse<fine_dtos::FineResponseDto>,
            // Admin settings
            admin_dtos::AdminSettingsDto,
            admin_dtos::UpdateSettingsDto,
            ApiResponse<admin_dtos::AdminSettingsDto>,
            // Email
            email_dtos::SendTestEmailDto,
            email_dtos::SendReportDto,
            email_dtos::EmailSendResultDto,
            ApiResponse<email_dtos::EmailSendResultDto>,
            // Dashboard
            dashboard_dtos::DashboardStatsDto,
            ApiResponse<dashboard_dtos::DashboardStatsDto>,
            ApiResponse<StatusMessage>,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "employees", description = "Employee management"),
        (name = "violation-types", description = "Violation type catalog"),
        (name = "fines", description = "Fine records with filtering and sorting"),
        (name = "admin", description = "Admin settings and account management"),
        (name = "email", description = "Receipts, reports and test emails over SMTP"),
        (name = "dashboard", description = "Aggregate counts for the dashboard"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Fine Tracker API",
        version = "0.1.0",
        description = "API documentation for the fine tracker",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
