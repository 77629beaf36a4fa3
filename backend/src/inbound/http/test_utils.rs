//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    MockAccountCommand, MockCompanyDirectory, MockNotificationInbox, MockPrincipalResolver,
    MockReferralCommand, MockReferralQuery,
};
use crate::domain::{CompanyId, EmployeePrincipal, PersonName, Principal, StudentPrincipal, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Ports bundle whose mocks carry no expectations, so any unplanned call
/// fails the test.
pub fn strict_ports() -> HttpStatePorts {
    HttpStatePorts {
        accounts: Arc::new(MockAccountCommand::new()),
        principals: Arc::new(MockPrincipalResolver::new()),
        companies: Arc::new(MockCompanyDirectory::new()),
        referrals: Arc::new(MockReferralCommand::new()),
        referrals_query: Arc::new(MockReferralQuery::new()),
        notifications: Arc::new(MockNotificationInbox::new()),
    }
}

/// Build state from strict mocks, letting the test swap in the ports it uses.
pub fn state_with(configure: impl FnOnce(&mut HttpStatePorts)) -> HttpState {
    let mut ports = strict_ports();
    configure(&mut ports);
    HttpState::new(ports)
}

pub fn test_principal_student() -> Principal {
    Principal::Student(StudentPrincipal {
        id: UserId::random(),
        name: PersonName::new("Sam Student").expect("name"),
    })
}

pub fn test_principal_employee(company_id: CompanyId) -> Principal {
    Principal::Employee(EmployeePrincipal {
        id: UserId::random(),
        name: PersonName::new("Erin Engineer").expect("name"),
        company_id,
    })
}

/// Resolver that accepts `token` and returns `principal` for it.
pub fn resolver_for(token: &'static str, principal: Principal) -> MockPrincipalResolver {
    let mut resolver = MockPrincipalResolver::new();
    resolver
        .expect_resolve()
        .withf(move |candidate| candidate == token)
        .returning(move |_| Ok(principal.clone()));
    resolver
}
