//! Shared fixtures: an in-memory SQLite database with the real schema.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use farmgate::domain::{Actor, AdminRole, FarmDetails, NewUser, Role, SellerStatus, User};
use farmgate::infra::{Migrator, Persistence, UnitOfWork};
use farmgate::services::{ApprovalEngine, Notifier, RegistrationLedger, RegistrationService};
use farmgate::with_transaction;

pub async fn connect() -> DatabaseConnection {
    // One connection, otherwise every pool member gets its own empty database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = SeaDatabase::connect(options)
        .await
        .expect("in-memory sqlite connects");
    Migrator::up(&db, None).await.expect("migrations apply");
    db
}

/// Notifier that remembers what it was asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Approved { user_id: i32, request_id: i32 },
    Rejected { user_id: i32, request_id: i32, reason: String },
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_approved(&self, user_id: i32, request_id: i32) {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Approved { user_id, request_id });
    }

    fn notify_rejected(&self, user_id: i32, request_id: i32, reason: &str) {
        self.sent.lock().unwrap().push(Sent::Rejected {
            user_id,
            request_id,
            reason: reason.to_string(),
        });
    }
}

pub struct Harness {
    pub db: DatabaseConnection,
    pub uow: Arc<Persistence>,
    pub ledger: Arc<RegistrationLedger<Persistence>>,
    pub engine: ApprovalEngine<Persistence>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub async fn new() -> Self {
        let db = connect().await;
        let uow = Arc::new(Persistence::new(db.clone()));
        let ledger = Arc::new(RegistrationLedger::new(uow.clone()));
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = ApprovalEngine::new(
            uow.clone(),
            ledger.clone() as Arc<dyn RegistrationService>,
            notifier.clone() as Arc<dyn Notifier>,
        );

        Self {
            db,
            uow,
            ledger,
            engine,
            notifier,
        }
    }

    pub async fn buyer(&self, name: &str) -> User {
        let new_user = NewUser::buyer(
            format!("{}@farm.test", name),
            format!("+1555-{}", name),
            name.to_string(),
            "unused-hash".to_string(),
        );
        with_transaction!(self.uow, |ctx| ctx.users().create(new_user).await)
            .expect("buyer is created")
    }

    pub async fn admin(&self, name: &str, admin_role: AdminRole) -> Actor {
        let new_user = NewUser::admin(
            format!("{}@admin.test", name),
            format!("+1666-{}", name),
            name.to_string(),
            "unused-hash".to_string(),
            admin_role,
        );
        let admin = with_transaction!(self.uow, |ctx| ctx.users().create(new_user).await)
            .expect("admin is created");
        Actor::new(admin.id, Role::Admin, Some(admin_role))
    }

    pub async fn user(&self, id: i32) -> User {
        self.uow
            .users()
            .find_by_id(id)
            .await
            .expect("user lookup")
            .expect("user exists")
    }

    pub async fn standing(&self, id: i32) -> (Role, SellerStatus) {
        let user = self.user(id).await;
        (user.role, user.seller_status)
    }

    pub async fn audit_count(&self) -> u64 {
        let (_, total) = self
            .uow
            .audit_log()
            .list(&Default::default())
            .await
            .expect("audit listing");
        total
    }
}

pub fn farm(name: &str) -> FarmDetails {
    FarmDetails {
        farm_name: name.to_string(),
        farm_location: Some("Willamette Valley".to_string()),
        products_grown: Some("berries, hazelnuts".to_string()),
        store_name: Some(format!("{} Stand", name)),
        store_description: None,
    }
}
