//! Lead and support-ticket forms.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{LeadRequest, RelayClient, TicketRequest};
use crate::error::{ClientError, Result, ValidationError};

/// Whether a form is waiting on its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
}

/// Receives validated form payloads.
#[async_trait]
pub trait FormSubmitter<P: Sync>: Send + Sync {
    async fn submit(&self, payload: &P) -> Result<()>;
}

/// Payload of the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    /// May be empty.
    pub phone: String,
}

/// Category of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    #[default]
    General,
    Technical,
    Billing,
    Login,
    Feature,
}

impl IssueType {
    pub const ALL: [IssueType; 5] = [
        Self::General,
        Self::Technical,
        Self::Billing,
        Self::Login,
        Self::Feature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Technical => "technical",
            Self::Billing => "billing",
            Self::Login => "login",
            Self::Feature => "feature",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown issue type '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Payload of the support ticket form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SupportTicketData {
    pub email: String,
    pub issue_type: IssueType,
    pub description: String,
    pub phone: Option<String>,
}

/// Reject blank values; the value itself is passed on as entered.
fn require(field: &'static str, value: &str) -> std::result::Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value.to_string())
}

/// Hand a validated payload to `handler`, tracking `state`.
async fn run_submit<P, H>(state: &mut FormState, payload: &P, handler: &H) -> Result<()>
where
    P: Sync,
    H: FormSubmitter<P> + ?Sized,
{
    *state = FormState::Submitting;
    let result = handler.submit(payload).await;
    *state = FormState::Idle;
    result.map_err(|e| match e {
        ClientError::Submission(msg) => ClientError::Submission(msg),
        other => ClientError::Submission(other.to_string()),
    })
}

/// Contact form: name and email required, phone optional.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    fields: ContactFormData,
    state: FormState,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.fields.email = email.into();
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.fields.phone = phone.into();
    }

    pub fn fields(&self) -> &ContactFormData {
        &self.fields
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Check required fields and build the payload.
    pub fn validate(&self) -> std::result::Result<ContactFormData, ValidationError> {
        Ok(ContactFormData {
            name: require("name", &self.fields.name)?,
            email: require("email", &self.fields.email)?,
            phone: self.fields.phone.clone(),
        })
    }

    /// Validate, then call `handler` once. Fields reset only on success.
    pub async fn submit<H>(&mut self, handler: &H) -> Result<()>
    where
        H: FormSubmitter<ContactFormData> + ?Sized,
    {
        let payload = self.validate()?;
        run_submit(&mut self.state, &payload, handler).await?;
        self.fields = ContactFormData::default();
        Ok(())
    }
}

/// Support ticket form: email and description required.
#[derive(Debug, Clone, Default)]
pub struct SupportTicketForm {
    fields: SupportTicketData,
    state: FormState,
}

impl SupportTicketForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.fields.email = email.into();
    }

    pub fn set_issue_type(&mut self, issue_type: IssueType) {
        self.fields.issue_type = issue_type;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.fields.description = description.into();
    }

    pub fn set_phone(&mut self, phone: Option<String>) {
        self.fields.phone = phone;
    }

    pub fn fields(&self) -> &SupportTicketData {
        &self.fields
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn validate(&self) -> std::result::Result<SupportTicketData, ValidationError> {
        Ok(SupportTicketData {
            email: require("email", &self.fields.email)?,
            issue_type: self.fields.issue_type,
            description: require("description", &self.fields.description)?,
            phone: self
                .fields
                .phone
                .clone()
                .filter(|p| !p.trim().is_empty()),
        })
    }

    /// Validate, then call `handler` once. Fields reset only on success.
    pub async fn submit<H>(&mut self, handler: &H) -> Result<()>
    where
        H: FormSubmitter<SupportTicketData> + ?Sized,
    {
        let payload = self.validate()?;
        run_submit(&mut self.state, &payload, handler).await?;
        self.fields = SupportTicketData::default();
        Ok(())
    }
}

#[async_trait]
impl FormSubmitter<ContactFormData> for RelayClient {
    async fn submit(&self, payload: &ContactFormData) -> Result<()> {
        let lead = LeadRequest {
            name: payload.name.clone(),
            email: payload.email.clone(),
            phone: Some(payload.phone.clone()).filter(|p| !p.trim().is_empty()),
            request_type: self.request_type().to_string(),
            message: None,
        };
        let stored = self.create_lead(&lead).await?;
        info!("Lead submitted: {}", stored["id"]);
        Ok(())
    }
}

#[async_trait]
impl FormSubmitter<SupportTicketData> for RelayClient {
    async fn submit(&self, payload: &SupportTicketData) -> Result<()> {
        let ticket = TicketRequest {
            email: payload.email.clone(),
            issue_type: payload.issue_type.to_string(),
            description: payload.description.clone(),
            phone: payload.phone.clone(),
        };
        let stored = self.create_ticket(&ticket).await?;
        info!("Support ticket submitted: {}", stored["id"]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use std::sync::Mutex;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Recorder<P> {
        received: Mutex<Vec<P>>,
        reject: bool,
    }

    impl<P> Recorder<P> {
        fn new(reject: bool) -> Self {
            Self {
                received: Mutex::new(Vec::new()),
                reject,
            }
        }

        fn count(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl<P: Clone + Send + Sync> FormSubmitter<P> for Recorder<P> {
        async fn submit(&self, payload: &P) -> Result<()> {
            self.received.lock().unwrap().push(payload.clone());
            if self.reject {
                return Err(ClientError::Status {
                    status: 500,
                    body: "down".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_contact_form_calls_handler_once() {
        let handler = Recorder::new(false);
        let mut form = ContactForm::new();
        form.set_name(" Ada ");
        form.set_email("ada@example.com");

        form.submit(&handler).await.unwrap();

        let received = handler.received.lock().unwrap().clone();
        assert_eq!(
            received,
            vec![ContactFormData {
                name: " Ada ".to_string(),
                email: "ada@example.com".to_string(),
                phone: String::new(),
            }]
        );
        assert_eq!(form.fields(), &ContactFormData::default());
        assert_eq!(form.state(), FormState::Idle);
    }

    #[tokio::test]
    async fn test_contact_form_requires_email() {
        let handler = Recorder::<ContactFormData>::new(false);
        let mut form = ContactForm::new();
        form.set_name("Ada");

        let err = form.submit(&handler).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::MissingField("email"))
        ));
        assert_eq!(handler.count(), 0);
    }

    #[tokio::test]
    async fn test_ticket_without_description_never_submits() {
        let handler = Recorder::<SupportTicketData>::new(false);
        let mut form = SupportTicketForm::new();
        form.set_email("ada@example.com");
        form.set_description("   ");

        let err = form.submit(&handler).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::MissingField("description"))
        ));
        assert_eq!(handler.count(), 0);
        assert_eq!(form.state(), FormState::Idle);
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_fields() {
        let handler = Recorder::new(true);
        let mut form = SupportTicketForm::new();
        form.set_email("ada@example.com");
        form.set_issue_type(IssueType::Billing);
        form.set_description("charged twice");

        let err = form.submit(&handler).await.unwrap_err();
        assert!(matches!(err, ClientError::Submission(_)));
        assert_eq!(handler.count(), 1);
        assert_eq!(form.fields().description, "charged twice");
        assert_eq!(form.state(), FormState::Idle);
    }

    #[test]
    fn test_issue_type_parse() {
        assert_eq!("Billing".parse::<IssueType>().unwrap(), IssueType::Billing);
        assert_eq!(IssueType::Feature.to_string(), "feature");
        assert!("refund".parse::<IssueType>().is_err());
    }

    #[test]
    fn test_blank_phone_is_dropped() {
        let mut form = SupportTicketForm::new();
        form.set_email("a@b.co");
        form.set_description("help");
        form.set_phone(Some("  ".to_string()));
        assert_eq!(form.validate().unwrap().phone, None);

        form.set_phone(Some(" 0300 1112233 ".to_string()));
        assert_eq!(form.validate().unwrap().phone.as_deref(), Some(" 0300 1112233 "));
    }

    #[test]
    fn test_validated_fields_are_passed_as_entered() {
        let mut form = SupportTicketForm::new();
        form.set_email(" a@b.co");
        form.set_description("  help me\n");

        let data = form.validate().unwrap();
        assert_eq!(data.email, " a@b.co");
        assert_eq!(data.description, "  help me\n");
    }

    #[tokio::test]
    async fn test_relay_client_submits_contact_as_lead() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/leads"))
            .and(body_json(serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "phone": "+12345678900",
                "request_type": "consultation"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "l-9"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = RelayClient::new(ClientConfig::default().with_api_url(server.uri()))
            .unwrap()
            .with_request_type("consultation");
        let mut form = ContactForm::new();
        form.set_name("Ada");
        form.set_email("ada@example.com");
        form.set_phone("+12345678900");

        form.submit(&client).await.unwrap();
    }

    #[tokio::test]
    async fn test_relay_client_submits_ticket() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/support-tickets"))
            .and(body_json(serde_json::json!({
                "email": "ada@example.com",
                "issue_type": "login",
                "description": "locked out"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "t-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = RelayClient::new(ClientConfig::default().with_api_url(server.uri())).unwrap();
        let mut form = SupportTicketForm::new();
        form.set_email("ada@example.com");
        form.set_issue_type(IssueType::Login);
        form.set_description("locked out");

        form.submit(&client).await.unwrap();
    }
}
