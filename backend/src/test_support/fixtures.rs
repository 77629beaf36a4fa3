//! Builders for domain values used across test suites.

use chrono::{DateTime, Utc};

use crate::domain::{
    CandidateDetails, CandidateInput, Company, CompanyId, CompanyName, EmailAddress, EmailDomain,
    EmployeePrincipal, Employment, FormConfig, PersonName, StudentPrincipal, User, UserId,
    UserRole,
};

pub fn student(name: &str, email: &str, now: DateTime<Utc>) -> User {
    User {
        id: UserId::random(),
        name: PersonName::new(name).expect("fixture name"),
        email: EmailAddress::new(email).expect("fixture email"),
        role: UserRole::Student,
        is_verified: false,
        created_at: now,
    }
}

pub fn employee(name: &str, work_email: &str, company_id: CompanyId, now: DateTime<Utc>) -> User {
    let work_email = EmailAddress::new(work_email).expect("fixture work email");
    User {
        id: UserId::random(),
        name: PersonName::new(name).expect("fixture name"),
        email: EmailAddress::new(format!("{}@gmail.com", work_email.local_part()))
            .expect("fixture email"),
        role: UserRole::Employee(Employment {
            company_id,
            work_email,
            position: Some("Engineer".to_owned()),
        }),
        is_verified: false,
        created_at: now,
    }
}

pub fn company(name: &str, domain: &str) -> Company {
    Company {
        id: CompanyId::random(),
        name: CompanyName::new(name).expect("fixture company name"),
        domain: EmailDomain::new(domain).expect("fixture domain"),
        form_config: FormConfig::initial(),
        created_by: UserId::random(),
    }
}

pub fn student_principal(user: &User) -> StudentPrincipal {
    StudentPrincipal {
        id: user.id,
        name: user.name.clone(),
    }
}

pub fn employee_principal(user: &User) -> EmployeePrincipal {
    EmployeePrincipal {
        id: user.id,
        name: user.name.clone(),
        company_id: user.company_id().expect("fixture employee has a company"),
    }
}

pub fn candidate() -> CandidateDetails {
    CandidateDetails::new(CandidateInput {
        name: "Sam Student".to_owned(),
        contact: "sam@uni.edu".to_owned(),
        resume_link: "https://drive.example.com/sam.pdf".to_owned(),
        job_link: "acme.com/jobs/1".to_owned(),
        motivation: Some("I love rockets".to_owned()),
    })
    .expect("fixture candidate")
}
