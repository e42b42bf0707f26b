use fueleu_dash::adapters::memory::{InMemoryComplianceStore, InMemoryRouteStore};
use fueleu_dash::adapters::notifier::RecordingNotifier;
use fueleu_dash::adapters::pooling::LocalPoolingService;
use fueleu_dash::core::dashboard::LoadState;
use fueleu_dash::core::views::RouteFilter;
use fueleu_dash::domain::model::{ComplianceBalance, PoolMember, VesselType};
use fueleu_dash::domain::ports::{BankingService, Notice, PoolingService, RouteRepository};
use fueleu_dash::domain::seed;
use fueleu_dash::{DashError, Dashboard, DashboardSettings};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

type MemoryDashboard = Dashboard<
    InMemoryRouteStore,
    InMemoryComplianceStore,
    LocalPoolingService,
    Arc<RecordingNotifier>,
>;

fn new_dashboard(balance: ComplianceBalance) -> (MemoryDashboard, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let dashboard = Dashboard::new(
        InMemoryRouteStore::new(seed::default_routes()),
        InMemoryComplianceStore::new([balance]),
        LocalPoolingService::new(),
        notifier.clone(),
        DashboardSettings::default(),
        seed::default_fleet_member(),
    );
    (dashboard, notifier)
}

async fn loaded_dashboard() -> (MemoryDashboard, Arc<RecordingNotifier>) {
    let (mut dashboard, notifier) = new_dashboard(seed::default_balance());
    assert_ok!(dashboard.load().await);
    (dashboard, notifier)
}

fn baseline_count(dashboard: &MemoryDashboard) -> usize {
    dashboard.routes().iter().filter(|r| r.is_baseline).count()
}

#[tokio::test]
async fn test_startup_moves_from_idle_to_ready() {
    let (mut dashboard, _) = new_dashboard(seed::default_balance());
    assert_eq!(dashboard.loading(), LoadState::Idle);
    assert!(dashboard.routes().is_empty());
    assert!(dashboard.balance().is_none());
    assert_eq!(dashboard.pooling().draft.len(), 1);
    assert_eq!(dashboard.pooling().draft[0].ship_id, "MY-FLEET-01");

    assert_ok!(dashboard.load().await);

    assert_eq!(dashboard.loading(), LoadState::Ready);
    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.routes().len(), 5);
    assert_eq!(
        dashboard.balance().copied(),
        Some(ComplianceBalance {
            year: 2025,
            balance: -500.0,
            banked: 2000.0
        })
    );
}

#[tokio::test]
async fn test_load_without_balance_for_reporting_year_returns_to_idle() {
    let (mut dashboard, notifier) = new_dashboard(ComplianceBalance {
        year: 2024,
        balance: 0.0,
        banked: 0.0,
    });

    let err = assert_err!(dashboard.load().await);
    assert!(matches!(err, DashError::BalanceNotFound { year: 2025 }));
    assert_eq!(dashboard.loading(), LoadState::Idle);
    assert!(matches!(notifier.last(), Some(Notice::Error(_))));
}

#[tokio::test]
async fn test_apply_then_bank_boundary_example() {
    let (mut dashboard, notifier) = loaded_dashboard().await;

    let after_apply = assert_ok!(dashboard.apply_surplus(500.0).await);
    assert_eq!(after_apply.balance, 0.0);
    assert_eq!(after_apply.banked, 1500.0);
    assert_eq!(dashboard.balance().copied(), Some(after_apply));

    // balance is now exactly 0, so any positive bank amount is too much
    let err = assert_err!(dashboard.bank_surplus(100.0).await);
    assert!(matches!(
        err,
        DashError::InsufficientBalance {
            requested,
            available
        } if requested == 100.0 && available == 0.0
    ));
    assert_eq!(dashboard.balance().copied(), Some(after_apply));
    assert_eq!(
        notifier.last(),
        Some(Notice::Error("Insufficient balance to bank.".to_string()))
    );
}

#[tokio::test]
async fn test_apply_more_than_banked_is_rejected_without_changes() {
    let (mut dashboard, notifier) = loaded_dashboard().await;
    let before = dashboard.balance().copied();

    let err = assert_err!(dashboard.apply_surplus(2000.5).await);
    assert!(matches!(err, DashError::InsufficientBanked { .. }));
    assert_eq!(dashboard.balance().copied(), before);
    assert_eq!(
        notifier.last(),
        Some(Notice::Error("Insufficient banked amount.".to_string()))
    );
}

#[tokio::test]
async fn test_non_positive_amounts_rejected_by_dashboard() {
    let (mut dashboard, _) = loaded_dashboard().await;
    let before = dashboard.balance().copied();

    for amount in [0.0, -10.0, f64::NAN] {
        let err = assert_err!(dashboard.bank_surplus(amount).await);
        assert!(matches!(err, DashError::InvalidAmount { .. }));
        let err = assert_err!(dashboard.apply_surplus(amount).await);
        assert!(matches!(err, DashError::InvalidAmount { .. }));
    }
    assert_eq!(dashboard.balance().copied(), before);
}

#[tokio::test]
async fn test_banking_before_load_is_not_loaded() {
    let (mut dashboard, _) = new_dashboard(seed::default_balance());
    let err = assert_err!(dashboard.bank_surplus(10.0).await);
    assert!(matches!(err, DashError::NotLoaded));
}

#[tokio::test]
async fn test_bank_then_apply_round_trip_at_store_level() {
    let store = InMemoryComplianceStore::new([ComplianceBalance {
        year: 2025,
        balance: 750.0,
        banked: 120.0,
    }]);
    let original = store.get_current_balance(2025).await.unwrap();

    for amount in [0.0, 1.0, 333.25, 750.0] {
        let banked = store.bank_surplus(amount, 2025).await.unwrap();
        assert_eq!(banked.balance, original.balance - amount);
        assert_eq!(banked.banked, original.banked + amount);
        assert!(banked.banked >= 0.0);

        let restored = store.apply_surplus(amount, 2025).await.unwrap();
        assert_eq!(restored, original);
    }

    let err = store.bank_surplus(750.01, 2025).await.unwrap_err();
    assert!(matches!(err, DashError::InsufficientBalance { .. }));
    assert_eq!(store.get_current_balance(2025).await.unwrap(), original);
}

#[tokio::test]
async fn test_set_baseline_refetches_routes() {
    let (mut dashboard, _) = loaded_dashboard().await;

    assert_ok!(dashboard.set_baseline("R003").await);
    assert_eq!(baseline_count(&dashboard), 1);
    let baseline = dashboard.routes().iter().find(|r| r.is_baseline).unwrap();
    assert_eq!(baseline.route_id, "R003");
    assert_eq!(dashboard.comparison().baseline_route_id.as_deref(), Some("R003"));

    assert_ok!(dashboard.set_baseline("R999").await);
    assert_eq!(baseline_count(&dashboard), 0);
    assert!(dashboard.comparison().baseline_route_id.is_none());
    assert_eq!(dashboard.routes().len(), 5);
}

#[tokio::test]
async fn test_baseline_toggle_keeps_route_order_and_data() {
    let store = InMemoryRouteStore::new(seed::default_routes());
    store.set_baseline("R005").await.unwrap();

    let routes = store.get_all_routes().await.unwrap();
    let ids: Vec<&str> = routes.iter().map(|r| r.route_id.as_str()).collect();
    assert_eq!(ids, vec!["R001", "R002", "R003", "R004", "R005"]);
    assert_eq!(routes[4].ghg_intensity, 90.5);

    let r005 = store.get_route_by_id("R005").await.unwrap().unwrap();
    assert!(r005.is_baseline);
    assert!(store.get_route_by_id("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_pool_example_is_valid_and_notifies_id() {
    let (mut dashboard, notifier) = loaded_dashboard().await;

    dashboard.remove_pool_member("MY-FLEET-01");
    dashboard.add_pool_member(PoolMember::new("IMO-1", "Aurora", 1200.0));
    dashboard.add_pool_member(PoolMember::new("IMO-2", "Borealis", -500.0));
    dashboard.add_pool_member(PoolMember::new("IMO-3", "Cygnus", -300.0));
    assert_eq!(dashboard.pooling().projected_total(), 400.0);
    assert!(dashboard.pooling().can_finalize());

    let pool = assert_ok!(dashboard.create_pool().await);
    assert_eq!(pool.total_balance, 400.0);
    assert!(pool.is_valid);
    assert_eq!(pool.members.len(), 3);
    assert!(pool.pool_id.starts_with("POOL-"));
    assert_eq!(dashboard.pooling().active_pool.as_ref(), Some(&pool));
    assert_eq!(
        notifier.last(),
        Some(Notice::Info(format!(
            "Pool Created Successfully! ID: {}",
            pool.pool_id
        )))
    );
}

#[tokio::test]
async fn test_negative_draft_cannot_be_finalized() {
    let (mut dashboard, notifier) = loaded_dashboard().await;
    assert!(!dashboard.pooling().is_draft_valid());

    let err = assert_err!(dashboard.create_pool().await);
    assert!(matches!(err, DashError::PoolCreationFailed { .. }));
    assert!(dashboard.pooling().active_pool.is_none());
    assert_eq!(
        notifier.last(),
        Some(Notice::Error("Failed to create pool".to_string()))
    );
}

#[tokio::test]
async fn test_draft_edits_after_finalize_do_not_touch_snapshot() {
    let (mut dashboard, _) = loaded_dashboard().await;
    dashboard.add_pool_member(PoolMember::new("IMO-7", "Delphi", 900.0));
    let pool = assert_ok!(dashboard.create_pool().await);

    dashboard.add_pool_member(PoolMember::new("IMO-8", "Eos", -2000.0));
    assert_eq!(dashboard.remove_pool_member("IMO-7"), 1);

    let active = dashboard.pooling().active_pool.as_ref().unwrap();
    assert_eq!(active, &pool);
    assert_eq!(active.total_balance, 400.0);
    assert_eq!(dashboard.pooling().draft.len(), 2);

    // one active pool at a time
    let err = assert_err!(dashboard.create_pool().await);
    assert!(matches!(err, DashError::PoolCreationFailed { .. }));
}

#[tokio::test]
async fn test_remove_drops_every_matching_ship() {
    let (mut dashboard, _) = loaded_dashboard().await;
    dashboard.add_pool_member(PoolMember::new("IMO-1", "Aurora", 10.0));
    dashboard.add_pool_member(PoolMember::new("IMO-1", "Aurora again", 20.0));

    assert_eq!(dashboard.remove_pool_member("IMO-1"), 2);
    assert_eq!(dashboard.remove_pool_member("IMO-1"), 0);
    assert_eq!(dashboard.pooling().draft.len(), 1);
}

#[tokio::test]
async fn test_added_member_without_id_gets_generated_imo_id() {
    let (mut dashboard, _) = loaded_dashboard().await;
    let added = dashboard
        .add_pool_member(PoolMember::new("", "Unregistered", 50.0))
        .clone();

    assert!(added.ship_id.starts_with("IMO-"));
    assert_eq!(added.ship_id.len(), "IMO-".len() + 5);
    assert_eq!(dashboard.pooling().draft.last(), Some(&added));
}

#[tokio::test]
async fn test_pooling_service_validity_matches_create_pool() {
    let service = LocalPoolingService::new();
    let drafts = vec![
        vec![],
        vec![PoolMember::new("A", "A", 0.0)],
        vec![PoolMember::new("A", "A", -0.5)],
        vec![
            PoolMember::new("A", "A", 1200.0),
            PoolMember::new("B", "B", -500.0),
            PoolMember::new("C", "C", -700.5),
        ],
    ];

    let mut ids = std::collections::HashSet::new();
    for members in drafts {
        let pool = service.create_pool(&members).await.unwrap();
        let sum: f64 = members.iter().map(|m| m.verified_cb).sum();
        assert_eq!(pool.total_balance, sum);
        assert_eq!(pool.is_valid, sum >= 0.0);
        assert_eq!(service.validate_pool(&members), pool.is_valid);
        assert!(ids.insert(pool.pool_id));
    }
}

#[tokio::test]
async fn test_filtered_routes_view() {
    let (dashboard, _) = loaded_dashboard().await;
    let filter = RouteFilter {
        vessel_type: Some(VesselType::Container),
        search: Some("R00".to_string()),
        ..Default::default()
    };

    let ids: Vec<&str> = dashboard
        .filtered_routes(&filter)
        .iter()
        .map(|r| r.route_id.as_str())
        .collect();
    assert_eq!(ids, vec!["R001", "R005"]);

    let overview = dashboard.banking_overview().unwrap();
    assert!(overview.can_apply);
    assert!(!overview.can_bank);
}
