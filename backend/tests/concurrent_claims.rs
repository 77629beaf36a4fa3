//! Racing employees over one broadcast request.
//!
//! Many employees of the same company accept a broadcast at once from
//! separate runtime workers; exactly one claim lands and every other caller
//! receives a conflict.

use std::sync::Arc;

use mockable::Clock;
use referrals::domain::ports::{
    CreateReferral, ReferralCommand, ReferralQuery, UserRepository,
};
use referrals::domain::{
    Decision, ErrorCode, NewCompany, ReferralService, ReferralStatus, ReferralTarget,
};
use referrals::outbound::memory::InMemoryStore;
use referrals::test_support::{MutableClock, fixtures};
use rstest::rstest;

type Service = ReferralService<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>;

fn service(store: &InMemoryStore, clock: Arc<MutableClock>) -> Service {
    let shared = Arc::new(store.clone());
    let clock: Arc<dyn Clock> = clock;
    ReferralService::new(shared.clone(), shared.clone(), shared.clone(), shared, clock)
}

#[rstest]
#[case(2)]
#[case(8)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn exactly_one_employee_claims_a_broadcast(#[case] contenders: usize) {
    let clock = Arc::new(MutableClock::fixed());
    let now = clock.utc();
    let store = InMemoryStore::new();
    let acme = fixtures::company("Acme", "acme.com");
    referrals::domain::ports::CompanyRepository::lock_domain(
        &store,
        &NewCompany {
            id: acme.id,
            name: acme.name.clone(),
            domain: acme.domain.clone(),
            form_config: acme.form_config.clone(),
            created_by: acme.created_by,
        },
    )
    .await
    .expect("lock acme");

    let student = fixtures::student("Sam Student", "sam@uni.edu", now);
    store.create(&student, "hash").await.expect("seed student");
    let mut employees = Vec::with_capacity(contenders);
    for index in 0..contenders {
        let employee = fixtures::employee(
            &format!("Employee {index}"),
            &format!("employee{index}@acme.com"),
            acme.id,
            now,
        );
        store.create(&employee, "hash").await.expect("seed employee");
        employees.push(employee);
    }

    let service = Arc::new(service(&store, clock));
    let broadcast = service
        .create(
            &fixtures::student_principal(&student),
            CreateReferral {
                target: ReferralTarget::Company(acme.id),
                candidate: fixtures::candidate(),
            },
        )
        .await
        .expect("broadcast created");

    let handles: Vec<_> = employees
        .iter()
        .map(|employee| {
            let service = Arc::clone(&service);
            let principal = fixtures::employee_principal(employee);
            let request_id = broadcast.id;
            tokio::spawn(async move {
                service
                    .decide(&principal, &request_id, Decision::Accept)
                    .await
                    .map(|decided| (principal.id, decided))
            })
        })
        .collect();

    let mut winners = Vec::new();
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("decision task") {
            Ok(win) => winners.push(win),
            Err(err) => {
                assert_eq!(err.code(), ErrorCode::Conflict, "loser error: {err:?}");
                conflicts += 1;
            }
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(conflicts, contenders - 1);
    let (winner_id, decided) = &winners[0];
    assert_eq!(decided.employee_id, Some(*winner_id));
    assert_eq!(decided.status, ReferralStatus::Accepted);

    let listed = service
        .for_student(&fixtures::student_principal(&student))
        .await
        .expect("student listing");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].request.employee_id, Some(*winner_id));
}
