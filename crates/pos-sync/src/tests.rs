//! Controller and Debouncer Tests
//!
//! Drives the controllers against a scripted transport whose replies can be
//! released in any order.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::{
        endpoints, listen, Categories, CategoryRecord, ClientConfig, CodeFeed, FailurePolicy,
        Flash, ReceiptKey, ReceiptsV1, ReceiptsV2, ScanDebouncer, Status, SyncController,
        SyncError, SyncResult, Timer, Transport,
    };

    // ========================
    // Test Doubles
    // ========================

    enum Reply {
        Now(SyncResult<String>),
        Later(oneshot::Receiver<SyncResult<String>>),
    }

    #[derive(Default)]
    struct ScriptedTransport {
        replies: RefCell<VecDeque<Reply>>,
        calls: RefCell<Vec<(String, Option<String>)>>,
    }

    impl ScriptedTransport {
        fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        fn ok(&self, body: &str) {
            self.replies.borrow_mut().push_back(Reply::Now(Ok(body.to_string())));
        }

        fn fail(&self, message: &str) {
            self.replies
                .borrow_mut()
                .push_back(Reply::Now(Err(SyncError::Transport(message.to_string()))));
        }

        fn deferred(&self) -> oneshot::Sender<SyncResult<String>> {
            let (tx, rx) = oneshot::channel();
            self.replies.borrow_mut().push_back(Reply::Later(rx));
            tx
        }

        fn calls(&self) -> Vec<(String, Option<String>)> {
            self.calls.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl Transport for ScriptedTransport {
        async fn post(&self, path: &str, body: Option<String>) -> SyncResult<String> {
            self.calls.borrow_mut().push((path.to_string(), body));
            let reply = self.replies.borrow_mut().pop_front();
            match reply {
                Some(Reply::Now(result)) => result,
                Some(Reply::Later(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(SyncError::Transport("reply dropped".into()))),
                None => Err(SyncError::Transport("no scripted reply".into())),
            }
        }
    }

    struct TokioTimer;

    #[async_trait(?Send)]
    impl Timer for TokioTimer {
        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }

    fn categories(transport: &Rc<ScriptedTransport>) -> SyncController<Categories, ScriptedTransport> {
        SyncController::new(transport.clone(), FailurePolicy::SetError)
    }

    fn debouncer(transport: &Rc<ScriptedTransport>) -> ScanDebouncer<ScriptedTransport, TokioTimer> {
        ScanDebouncer::new(transport.clone(), Rc::new(TokioTimer))
    }

    const MILK: &str = r#"{"items":[{"product":"P1","category":"Dairy","name":"Milk"}]}"#;

    // ========================
    // Refresh
    // ========================

    #[tokio::test]
    async fn test_category_list_happy_path() {
        let transport = ScriptedTransport::new();
        transport.ok(MILK);
        let controller = categories(&transport);

        controller.refresh().await;

        let state = controller.state();
        assert_eq!(state.items, vec![CategoryRecord::new("P1", "Dairy", "Milk")]);
        assert_eq!(state.message, "");
        assert!(!state.is_error());
        assert_eq!(state.status, Status::Success);
        assert_eq!(transport.calls(), vec![(endpoints::CATEGORIES_LIST.to_string(), None)]);
    }

    #[tokio::test]
    async fn test_refresh_preserves_order_and_count() {
        let transport = ScriptedTransport::new();
        transport.ok(
            r#"{"items":[
                {"product":"P3","category":"","name":""},
                {"product":"P1","category":"Dairy","name":"Milk"},
                {"product":"P2","category":"Bakery","name":"Bread"}
            ]}"#,
        );
        let controller = categories(&transport);

        controller.refresh().await;

        let products: Vec<String> = controller.state().items.into_iter().map(|r| r.product).collect();
        assert_eq!(products, vec!["P3", "P1", "P2"]);
    }

    #[tokio::test]
    async fn test_loading_visible_until_resolution() {
        let transport = ScriptedTransport::new();
        let release = transport.deferred();
        let controller = categories(&transport);
        assert_eq!(controller.status(), Status::Idle);

        let pending = controller.refresh();
        // Visible before the future is even polled
        assert_eq!(controller.status(), Status::Loading);

        tokio::join!(pending, async {
            tokio::task::yield_now().await;
            assert_eq!(controller.status(), Status::Loading);
            release.send(Ok(MILK.to_string())).unwrap();
        });

        assert_eq!(controller.status(), Status::Success);
    }

    #[tokio::test]
    async fn test_refresh_transport_failure_clears_items() {
        let transport = ScriptedTransport::new();
        transport.ok(MILK);
        transport.fail("Failed to fetch");
        let controller = categories(&transport);

        controller.refresh().await;
        assert!(controller.state().has_items());
        controller.refresh().await;

        let state = controller.state();
        assert_eq!(state.status, Status::Error);
        assert!(state.items.is_empty());
        assert_eq!(state.message, "Network error: Failed to fetch");
    }

    #[tokio::test]
    async fn test_refresh_decode_failures() {
        let transport = ScriptedTransport::new();
        transport.ok("<html>502 Bad Gateway</html>");
        transport.ok(r#"{"success":false,"message":"database is locked"}"#);
        let controller = categories(&transport);

        controller.refresh().await;
        let state = controller.state();
        assert_eq!(state.status, Status::Error);
        assert!(state.message.starts_with("Invalid response:"));

        controller.refresh().await;
        let state = controller.state();
        assert_eq!(state.status, Status::Error);
        assert!(state.items.is_empty());
    }

    #[tokio::test]
    async fn test_keep_success_policy() {
        let transport = ScriptedTransport::new();
        transport.fail("Failed to fetch");
        let controller = SyncController::<ReceiptsV1, _>::new(transport.clone(), FailurePolicy::KeepSuccess);

        controller.refresh().await;

        let state = controller.state();
        assert_eq!(state.status, Status::Success);
        assert!(state.items.is_empty());
        assert_eq!(state.message, "Network error: Failed to fetch");
    }

    #[tokio::test]
    async fn test_last_resolved_refresh_wins() {
        let transport = ScriptedTransport::new();
        let first_reply = transport.deferred();
        let second_reply = transport.deferred();
        let controller = categories(&transport);

        let first = controller.refresh();
        let second = controller.refresh();

        tokio::join!(first, second, async {
            second_reply
                .send(Ok(r#"{"items":[{"product":"NEW","category":"","name":""}]}"#.into()))
                .unwrap();
            while controller.status() == Status::Loading {
                tokio::task::yield_now().await;
            }
            first_reply
                .send(Ok(r#"{"items":[{"product":"OLD","category":"","name":""}]}"#.into()))
                .unwrap();
        });

        // The first request resolved last, so its stale list is what remains
        assert_eq!(controller.state().items[0].product, "OLD");
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_lifecycle() {
        let transport = ScriptedTransport::new();
        transport.ok(MILK);
        let controller = categories(&transport);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        controller.subscribe(move |state| sink.borrow_mut().push(state.status));
        controller.refresh().await;

        assert_eq!(*seen.borrow(), vec![Status::Loading, Status::Success]);
    }

    // ========================
    // Receipts
    // ========================

    #[tokio::test]
    async fn test_receipts_v2_mapping() {
        let transport = ScriptedTransport::new();
        transport.ok(
            r#"{"success":true,"items":[
                {"type":"Categorized","date":"2023.01.02","category":"Dairy","name":"Milk","quantity":0,"sum":2},
                {"type":"Uncategorized","date":"2023.01.02","product":"BREAD WHITE","quantity":0.5,"sum":31.4}
            ]}"#,
        );
        let controller = SyncController::<ReceiptsV2, _>::new(transport.clone(), FailurePolicy::SetError);

        controller.refresh().await;

        let items = controller.state().items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, ReceiptKey::Date("2023.01.02".into()));
        assert!(items[0].categorized);
        assert_eq!(items[0].quantity.to_string(), "0.000");
        assert_eq!(items[0].sum.to_string(), "2.00");
        assert!(!items[1].categorized);
        assert_eq!(items[1].product, "BREAD WHITE");
        assert_eq!(items[1].quantity.to_string(), "0.500");
        assert_eq!(items[1].sum.to_string(), "31.40");
        assert_eq!(transport.calls()[0].0, endpoints::TICKETS_LIST);
    }

    #[tokio::test]
    async fn test_receipts_v1_reads_ticket_endpoint() {
        let transport = ScriptedTransport::new();
        transport.ok(r#"{"items":[{"type":"categorized","ticket":"T-7","quantity":1,"sum":1}]}"#);
        let controller = SyncController::<ReceiptsV1, _>::new(transport.clone(), FailurePolicy::KeepSuccess);

        controller.refresh().await;

        let items = controller.state().items;
        assert_eq!(items[0].key, ReceiptKey::Ticket("T-7".into()));
        assert!(!items[0].categorized);
        assert_eq!(transport.calls()[0].0, endpoints::TICKETS_V1);
    }

    #[tokio::test]
    async fn test_clear_empties_items() {
        let transport = ScriptedTransport::new();
        transport.ok(r#"{"items":[{"type":"Categorized","date":"d","quantity":1,"sum":1}]}"#);
        transport.ok("{}");
        let controller = SyncController::<ReceiptsV2, _>::new(transport.clone(), FailurePolicy::SetError);

        controller.refresh().await;
        assert!(controller.state().has_items());
        controller.clear().await;

        let state = controller.state();
        assert!(state.items.is_empty());
        assert_eq!(state.message, "");
        assert_eq!(state.status, Status::Success);
        assert_eq!(transport.calls()[1], (endpoints::TICKETS_CLEAR.to_string(), None));
    }

    #[tokio::test]
    async fn test_clear_failure_still_empties_items() {
        let transport = ScriptedTransport::new();
        transport.ok(r#"{"items":[{"type":"Categorized","date":"d","quantity":1,"sum":1}]}"#);
        transport.fail("connection reset");
        let controller = SyncController::<ReceiptsV2, _>::new(transport.clone(), FailurePolicy::SetError);

        controller.refresh().await;
        controller.clear().await;

        let state = controller.state();
        assert!(state.items.is_empty());
        assert_eq!(state.status, Status::Error);
        assert_eq!(state.message, "Network error: connection reset");
    }

    // ========================
    // Mutate
    // ========================

    #[tokio::test]
    async fn test_mutate_sends_full_record_and_keeps_items() {
        let transport = ScriptedTransport::new();
        transport.ok(r#"{"items":[{"product":"P1","category":"","name":""}]}"#);
        transport.ok(r#"{"success":true}"#);
        let controller = categories(&transport);

        controller.refresh().await;
        let before = controller.state().items;

        let pending = controller.mutate(CategoryRecord::new("P1", "Dairy", "Milk"));
        assert_eq!(controller.status(), Status::Loading);
        pending.await;

        let state = controller.state();
        assert_eq!(state.status, Status::Success);
        assert_eq!(state.items, before);
        assert_eq!(
            transport.calls()[1],
            (
                endpoints::CATEGORIES_UPDATE.to_string(),
                Some(r#"{"product":"P1","category":"Dairy","name":"Milk"}"#.to_string())
            )
        );
    }

    #[tokio::test]
    async fn test_mutate_failure_keeps_items() {
        let transport = ScriptedTransport::new();
        transport.ok(MILK);
        transport.fail("timeout");
        let controller = categories(&transport);

        controller.refresh().await;
        controller.mutate(CategoryRecord::new("P1", "Dairy", "Whole milk")).await;

        let state = controller.state();
        assert_eq!(state.status, Status::Error);
        assert_eq!(state.message, "Network error: timeout");
        assert_eq!(state.items, vec![CategoryRecord::new("P1", "Dairy", "Milk")]);
    }

    #[tokio::test]
    async fn test_mutate_ignores_non_json_reply() {
        let transport = ScriptedTransport::new();
        transport.ok("");
        let controller = categories(&transport);

        controller.mutate(CategoryRecord::new("P9", "Snacks", "Chips")).await;

        assert_eq!(controller.status(), Status::Success);
    }

    // ========================
    // Scan
    // ========================

    const FOUND: &str = r#"{"success":true,"message":null}"#;

    #[tokio::test(start_paused = true)]
    async fn test_debounce_sequence() {
        let transport = ScriptedTransport::new();
        for _ in 0..3 {
            transport.ok(FOUND);
        }
        let scanner = debouncer(&transport);

        for code in ["A", "A", "A", "B", "B", "A"] {
            if let Some(lookup) = scanner.on_detect(code) {
                lookup.await;
            }
        }

        let bodies: Vec<Option<String>> = transport.calls().into_iter().map(|(_, body)| body).collect();
        assert_eq!(
            bodies,
            vec![Some("\"A\"".to_string()), Some("\"B\"".to_string()), Some("\"A\"".to_string())]
        );
        assert!(transport.calls().iter().all(|(path, _)| path == endpoints::QRCODE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_redetection_in_flight_is_suppressed() {
        let transport = ScriptedTransport::new();
        let release = transport.deferred();
        let scanner = debouncer(&transport);

        let lookup = scanner.on_detect("t=20230102T1200&s=149.90").expect("first detection dispatches");
        assert!(scanner.on_detect("t=20230102T1200&s=149.90").is_none());
        assert!(scanner.state().is_loading());

        release.send(Ok(FOUND.to_string())).unwrap();
        lookup.await;

        assert_eq!(transport.calls().len(), 1);
        assert_eq!(scanner.last_dispatched().as_deref(), Some("t=20230102T1200&s=149.90"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_detection_ignored() {
        let transport = ScriptedTransport::new();
        let scanner = debouncer(&transport);

        assert!(scanner.on_detect("").is_none());
        assert_eq!(scanner.state().status, Status::Idle);
        assert!(scanner.last_dispatched().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_success_flashes_green_then_reverts() {
        let transport = ScriptedTransport::new();
        transport.ok(FOUND);
        let scanner = debouncer(&transport);
        let flashes = Rc::new(RefCell::new(Vec::new()));

        let sink = flashes.clone();
        scanner.subscribe(move |view| sink.borrow_mut().push(view.flash));
        scanner.on_detect("A").unwrap().await;

        let view = scanner.state();
        assert!(view.success);
        assert_eq!(view.status, Status::Success);
        assert_eq!(view.message, "");
        assert_eq!(view.code, "A");
        assert_eq!(*flashes.borrow(), vec![Flash::None, Flash::Green, Flash::None]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_transport_failure() {
        let transport = ScriptedTransport::new();
        transport.fail("Failed to fetch");
        let scanner = debouncer(&transport);
        let flashes = Rc::new(RefCell::new(Vec::new()));

        let sink = flashes.clone();
        scanner.subscribe(move |view| sink.borrow_mut().push(view.flash));
        scanner.on_detect("A").unwrap().await;

        let view = scanner.state();
        assert!(!view.success);
        assert!(view.is_error());
        assert!(!view.is_loading());
        assert_eq!(view.message, "Network error: Failed to fetch");
        assert!(flashes.borrow().contains(&Flash::Red));
        assert_eq!(view.flash, Flash::None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_server_rejection() {
        let transport = ScriptedTransport::new();
        transport.ok(r#"{"success":false,"message":"Failed to load ticket: not found"}"#);
        let scanner = debouncer(&transport);

        scanner.on_detect("garbage").unwrap().await;

        let view = scanner.state();
        assert!(!view.success);
        assert!(view.is_error());
        assert_eq!(view.message, "Failed to load ticket: not found");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flash_lasts_fixed_window() {
        let transport = ScriptedTransport::new();
        transport.ok(FOUND);
        let scanner = debouncer(&transport);

        let lookup = scanner.on_detect("A").unwrap();
        tokio::join!(lookup, async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            assert_eq!(scanner.state().flash, Flash::Green);
            // Repeats do not extend the window
            assert!(scanner.on_detect("A").is_none());
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(scanner.state().flash, Flash::None);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_older_timer_does_not_cut_newer_flash() {
        let transport = ScriptedTransport::new();
        transport.ok(FOUND);
        let second_reply = transport.deferred();
        let scanner = debouncer(&transport);

        let first = scanner.on_detect("A").unwrap();
        let second = scanner.on_detect("B").unwrap();

        tokio::join!(first, second, async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            second_reply
                .send(Ok(r#"{"success":false,"message":"duplicate"}"#.into()))
                .unwrap();
            tokio::time::sleep(Duration::from_millis(60)).await;
            assert_eq!(scanner.state().flash, Flash::Red);
            tokio::time::sleep(Duration::from_millis(200)).await;
            assert_eq!(scanner.state().flash, Flash::None);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_allows_rescan() {
        let transport = ScriptedTransport::new();
        transport.ok(FOUND);
        transport.ok(FOUND);
        let scanner = debouncer(&transport);

        scanner.on_detect("A").unwrap().await;
        assert!(scanner.on_detect("A").is_none());
        scanner.reset();
        scanner.on_detect("A").expect("reset clears the marker").await;

        assert_eq!(transport.calls().len(), 2);
    }

    // ========================
    // Feed
    // ========================

    #[tokio::test(start_paused = true)]
    async fn test_feed_drives_debouncer_until_unsubscribed() {
        let transport = ScriptedTransport::new();
        transport.ok(FOUND);
        transport.ok(FOUND);
        let scanner = debouncer(&transport);
        let feed = CodeFeed::new();

        let codes = feed.subscribe();
        assert!(feed.is_subscribed());

        tokio::join!(listen(scanner.clone(), codes), async {
            for code in ["A", "A", "B", "B", "B"] {
                assert!(feed.push(code.to_string()));
            }
            tokio::task::yield_now().await;
            feed.unsubscribe();
        });

        assert!(!feed.is_subscribed());
        assert!(!feed.push("C".to_string()));
        assert_eq!(transport.calls().len(), 2);
        assert_eq!(scanner.last_dispatched().as_deref(), Some("B"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarted_feed_keeps_last_code() {
        let transport = ScriptedTransport::new();
        transport.ok(FOUND);
        transport.ok(FOUND);
        let scanner = debouncer(&transport);
        let feed = CodeFeed::new();

        // First camera session scans A
        let codes = feed.subscribe();
        tokio::join!(listen(scanner.clone(), codes), async {
            assert!(feed.push("A".to_string()));
            tokio::task::yield_now().await;
            feed.unsubscribe();
        });

        // Second session sees the same receipt, then a new one
        let codes = feed.subscribe();
        tokio::join!(listen(scanner.clone(), codes), async {
            assert!(feed.push("A".to_string()));
            assert!(feed.push("B".to_string()));
            tokio::task::yield_now().await;
            feed.unsubscribe();
        });

        let bodies: Vec<_> = transport.calls().into_iter().filter_map(|(_, body)| body).collect();
        assert_eq!(bodies, vec!["\"A\"".to_string(), "\"B\"".to_string()]);
    }

    #[test]
    fn test_resubscribe_closes_previous_stream() {
        use futures::StreamExt;

        let feed = CodeFeed::new();
        let mut old = feed.subscribe();
        let _current = feed.subscribe();

        let next = futures::executor::block_on(old.next());
        assert!(next.is_none());
    }

    // ========================
    // Wiring
    // ========================

    #[tokio::test]
    async fn test_config_selects_receipts_policy() {
        let config: ClientConfig = serde_json::from_str(r#"{"receipts_api":"v1"}"#).unwrap();
        let transport = ScriptedTransport::new();
        transport.fail("offline");
        let controller = SyncController::<ReceiptsV1, _>::new(transport.clone(), config.receipts_failure());
        assert_eq!(controller.policy(), FailurePolicy::KeepSuccess);

        controller.refresh().await;

        assert_eq!(controller.status(), Status::Success);
        assert_eq!(controller.state().message, "Network error: offline");
    }
}
