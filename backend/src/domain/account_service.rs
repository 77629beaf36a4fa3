//! Account domain service: signup with the company domain lock, login, the
//! bearer-token auth gate and account lookups.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AccountCommand, CompanyRepository, CompanyRepositoryError, PasswordHashError, PasswordHasher,
    PrincipalResolver, TokenError, TokenService, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Company, CompanyId, EmployeeSignup, Employment, Error, FormConfig, LoginCredentials,
    LoginOutcome, NewCompany, Principal, SignupRequest, SignupRole, TokenClaims, User, UserId,
    UserRole,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing [`AccountCommand`] and [`PrincipalResolver`].
#[derive(Clone)]
pub struct AccountService<U, C, H, T> {
    users: Arc<U>,
    companies: Arc<C>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, C, H, T> AccountService<U, C, H, T> {
    pub fn new(
        users: Arc<U>,
        companies: Arc<C>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            companies,
            hasher,
            tokens,
            clock,
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => Error::conflict("email is already registered"),
    }
}

pub(crate) fn map_company_error(error: CompanyRepositoryError) -> Error {
    match error {
        CompanyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("company repository unavailable: {message}"))
        }
        CompanyRepositoryError::Query { message } => {
            Error::internal(format!("company repository error: {message}"))
        }
        CompanyRepositoryError::DomainTaken { domain } => {
            Error::conflict(format!("domain {domain} is registered to another company"))
                .with_details(json!({ "field": "workEmail", "code": "domain_taken" }))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

impl<U, C, H, T> AccountService<U, C, H, T>
where
    U: UserRepository,
    C: CompanyRepository,
    H: PasswordHasher,
    T: TokenService,
{
    /// Resolve the company an employee signs up under, creating it with their
    /// domain when the name is new.
    async fn lock_company(
        &self,
        user_id: UserId,
        signup: &EmployeeSignup,
    ) -> Result<Company, Error> {
        let domain = signup.work_email.domain();
        let candidate = NewCompany {
            id: CompanyId::random(),
            name: signup.company_name.clone(),
            domain: domain.clone(),
            form_config: FormConfig::initial(),
            created_by: user_id,
        };
        let company = self
            .companies
            .lock_domain(&candidate)
            .await
            .map_err(map_company_error)?;
        if company.domain != domain {
            return Err(Error::forbidden(format!(
                "domain mismatch: you must use an email ending in @{}",
                company.domain
            ))
            .with_details(json!({
                "field": "workEmail",
                "code": "domain_mismatch",
                "expectedDomain": company.domain.as_ref(),
            })));
        }
        Ok(company)
    }

    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<U, C, H, T> AccountCommand for AccountService<U, C, H, T>
where
    U: UserRepository,
    C: CompanyRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn signup(&self, request: SignupRequest) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(request.password.as_str())
            .await
            .map_err(map_hash_error)?;
        let id = UserId::random();

        let role = match &request.role {
            SignupRole::Student => UserRole::Student,
            SignupRole::Employee(signup) => {
                let company = self.lock_company(id, signup).await?;
                UserRole::Employee(Employment {
                    company_id: company.id,
                    work_email: signup.work_email.clone(),
                    position: signup.position.clone(),
                })
            }
        };

        let user = User {
            id,
            name: request.name,
            email: request.email,
            role,
            is_verified: false,
            created_at: self.clock.utc(),
        };
        self.users
            .create(&user, &password_hash)
            .await
            .map_err(map_user_error)?;

        if user.role.employment().is_some() {
            info!(
                user_id = %user.id,
                link = %format!("/verify/{}", user.id),
                "verification link issued"
            );
        }
        Ok(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let claims = TokenClaims::issue(stored.user.id, self.clock.utc());
        let token = self.tokens.issue(&claims).map_err(|err| match err {
            TokenError::Signing { message } => {
                Error::internal(format!("token signing failed: {message}"))
            }
            other => Error::internal(other.to_string()),
        })?;
        Ok(LoginOutcome {
            token,
            user: stored.user,
        })
    }

    async fn verify(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .mark_verified(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load_user(user_id).await
    }
}

#[async_trait]
impl<U, C, H, T> PrincipalResolver for AccountService<U, C, H, T>
where
    U: UserRepository,
    C: CompanyRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn resolve(&self, token: &str) -> Result<Principal, Error> {
        let claims = self.tokens.verify(token).map_err(|err| match err {
            TokenError::Expired => Error::unauthorized("token has expired"),
            _ => Error::unauthorized("invalid token"),
        })?;
        let user = self
            .users
            .find_by_id(&claims.subject)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        Ok(Principal::from_user(&user))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
