// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the resolution cascade.
//!
//! Covers ordering and short-circuiting with call-counting tiers, error and
//! timeout fall-through, the always-answers guarantee, and the full standard
//! chain wired to in-memory stores and scripted collaborators.

use async_trait::async_trait;
use neurochat_core::application::{
    AnalyticsRecorder, ChainDependencies, FeedbackSubmission, ResolutionService,
    ResolutionSettings, StrategyChain,
};
use neurochat_core::domain::analytics::FeedbackKind;
use neurochat_core::domain::business::{BusinessProduct, NewBusinessProduct};
use neurochat_core::domain::candidate::{RawCandidate, StrategyId};
use neurochat_core::domain::generation::{
    is_catalog_category, BriefKind, CapabilityError, GenerationBrief, ProductGenerator,
};
use neurochat_core::domain::price::{Price, PriceInput};
use neurochat_core::domain::repository::BusinessDirectory;
use neurochat_core::domain::request::{EmotionReading, ShoppingRequest};
use neurochat_core::domain::resolution::TierOutcome;
use neurochat_core::domain::search::{SearchHit, WebSearch};
use neurochat_core::domain::strategy::{
    ResolutionContext, ResolutionStrategy, StrategyError, StrategyOutcome,
};
use neurochat_core::infrastructure::repositories::{InMemoryAnalyticsLog, InMemoryBusinessDirectory};
use neurochat_cortex::{CortexService, InMemoryPatternRepository, NullEventBus, StandardCortexService};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Scripted tiers
// ============================================================================

#[derive(Clone)]
enum Behavior {
    Found(Vec<RawCandidate>),
    Nothing,
    Fail,
    Hang,
}

struct CountingStrategy {
    id: StrategyId,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl CountingStrategy {
    fn new(id: StrategyId, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            id,
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResolutionStrategy for CountingStrategy {
    fn id(&self) -> StrategyId {
        self.id
    }

    async fn resolve(
        &self,
        _request: &ShoppingRequest,
        _ctx: &ResolutionContext,
    ) -> Result<StrategyOutcome, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Found(raw) => Ok(StrategyOutcome::Found(raw.clone())),
            Behavior::Nothing => Ok(StrategyOutcome::no_result("nothing scripted")),
            Behavior::Fail => Err(StrategyError::Capability(CapabilityError::Transport(
                "connection refused".into(),
            ))),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(StrategyOutcome::no_result("woke up too late"))
            }
        }
    }
}

fn raw(name: &str, category: &str, rupees: f64) -> RawCandidate {
    RawCandidate::new(name, category, PriceInput::inr(rupees))
}

fn stressed(text: &str) -> ShoppingRequest {
    ShoppingRequest::new(text, EmotionReading::new("stressed", 0.8))
}

struct Harness {
    service: ResolutionService,
    cortex: Arc<dyn CortexService>,
    analytics: Arc<InMemoryAnalyticsLog>,
}

fn harness(chain: StrategyChain, settings: ResolutionSettings) -> Harness {
    let cortex: Arc<dyn CortexService> = Arc::new(StandardCortexService::new(
        Arc::new(InMemoryPatternRepository::new()),
        Arc::new(NullEventBus),
    ));
    let analytics = Arc::new(InMemoryAnalyticsLog::new());
    let recorder = AnalyticsRecorder::new(analytics.clone(), cortex.clone());
    let service = ResolutionService::builder(chain, cortex.clone(), recorder)
        .settings(settings)
        .build();
    Harness {
        service,
        cortex,
        analytics,
    }
}

fn fast_settings() -> ResolutionSettings {
    ResolutionSettings {
        strategy_timeout: Duration::from_millis(100),
        ..ResolutionSettings::default()
    }
}

// ============================================================================
// Ordering and fall-through
// ============================================================================

#[tokio::test]
async fn test_first_successful_tier_short_circuits_the_rest() {
    let local = CountingStrategy::new(StrategyId::LocalBusiness, Behavior::Nothing);
    let pattern = CountingStrategy::new(
        StrategyId::PatternMatch,
        Behavior::Found(vec![raw("Weighted Blanket", "home-decoration", 2999.0)]),
    );
    let semantic = CountingStrategy::new(
        StrategyId::SemanticGeneration,
        Behavior::Found(vec![raw("Never Seen", "x", 1.0)]),
    );
    let chain = StrategyChain::new()
        .then(local.clone())
        .then(pattern.clone())
        .then(semantic.clone());
    let h = harness(chain, fast_settings());

    let result = h.service.resolve(&stressed("help me sleep better")).await;

    assert_eq!(result.strategy, StrategyId::PatternMatch);
    assert!(result.success);
    assert_eq!(local.calls(), 1);
    assert_eq!(pattern.calls(), 1);
    assert_eq!(semantic.calls(), 0);
    assert_eq!(result.attempts.len(), 2);
    assert_eq!(result.attempts[0].outcome, TierOutcome::NoResult);
}

#[tokio::test]
async fn test_errors_and_timeouts_fall_through() {
    let failing = CountingStrategy::new(StrategyId::LocalBusiness, Behavior::Fail);
    let hanging = CountingStrategy::new(StrategyId::PatternMatch, Behavior::Hang);
    let working = CountingStrategy::new(
        StrategyId::SemanticGeneration,
        Behavior::Found(vec![raw("Stress Ball", "sports-accessories", 199.0)]),
    );
    let chain = StrategyChain::new()
        .then(failing.clone())
        .then(hanging.clone())
        .then(working.clone());
    let h = harness(chain, fast_settings());

    let result = h.service.resolve(&stressed("something for my desk")).await;

    assert_eq!(result.strategy, StrategyId::SemanticGeneration);
    let outcomes: Vec<TierOutcome> = result.attempts.iter().map(|a| a.outcome).collect();
    assert_eq!(
        outcomes,
        vec![TierOutcome::Failed, TierOutcome::TimedOut, TierOutcome::Found]
    );
    assert_eq!(working.calls(), 1);
}

#[tokio::test]
async fn test_fully_rejected_output_falls_through() {
    let junk = CountingStrategy::new(
        StrategyId::WebSearch,
        Behavior::Found(vec![
            RawCandidate::new("No Price", "gadgets", PriceInput::text("See website")),
            raw("   ", "gadgets", 100.0),
            raw("Too Expensive", "gadgets", 50_000.0),
        ]),
    );
    let context = CountingStrategy::new(
        StrategyId::ContextAware,
        Behavior::Found(vec![raw("Desk Plant", "home-decoration", 349.0)]),
    );
    let chain = StrategyChain::new().then(junk.clone()).then(context.clone());
    let h = harness(chain, fast_settings());

    let request = stressed("something green for my desk").with_budget(Price::inr(1000.0).unwrap());
    let result = h.service.resolve(&request).await;

    assert_eq!(result.strategy, StrategyId::ContextAware);
    assert_eq!(result.attempts[0].outcome, TierOutcome::Rejected);
    assert_eq!(result.candidates.len(), 1);
}

#[tokio::test]
async fn test_validated_candidates_are_sound() {
    let mixed = CountingStrategy::new(
        StrategyId::SemanticGeneration,
        Behavior::Found(vec![
            raw("Herbal Tea Sampler", " Groceries ", 450.0),
            RawCandidate::new("Imported Diffuser", "home-decoration", PriceInput::usd(20.0)),
            RawCandidate::new("Refund Voucher", "misc", PriceInput::inr(-50.0)),
            RawCandidate::new("Nameless Category", "  ", PriceInput::inr(99.0)),
            RawCandidate::new("Spa Kit", "beauty", PriceInput::text("Rs. 1,299")),
        ]),
    );
    let h = harness(StrategyChain::new().then(mixed), fast_settings());

    let result = h.service.resolve(&stressed("need to unwind tonight")).await;

    assert!(result.candidates.len() >= 3);
    for candidate in &result.candidates {
        assert!(candidate.price.amount() >= 0.0);
        assert!(!candidate.categories.is_empty());
        assert!(candidate.categories.iter().all(|c| !c.trim().is_empty()));
        assert_eq!(candidate.source, StrategyId::SemanticGeneration);
    }
    let diffuser = result
        .candidates
        .iter()
        .find(|c| c.name == "Imported Diffuser")
        .unwrap();
    assert_eq!(diffuser.price.rounded(), 1660);
    assert!(result.candidates.iter().all(|c| c.name != "Nameless Category"));
}

#[tokio::test]
async fn test_candidates_are_truncated_to_max() {
    let many: Vec<RawCandidate> = (0..10)
        .map(|i| raw(&format!("Item {}", i), "gifts", 100.0 + i as f64))
        .collect();
    let tier = CountingStrategy::new(StrategyId::SemanticGeneration, Behavior::Found(many));
    let settings = ResolutionSettings {
        max_candidates: 4,
        ..fast_settings()
    };
    let h = harness(StrategyChain::new().then(tier), settings);

    let result = h.service.resolve(&stressed("gift ideas please")).await;
    assert_eq!(result.candidates.len(), 4);
}

// ============================================================================
// Totality and side effects
// ============================================================================

#[tokio::test]
async fn test_exhausted_cascade_uses_fallback() {
    let chain = StrategyChain::new()
        .then(CountingStrategy::new(StrategyId::LocalBusiness, Behavior::Nothing))
        .then(CountingStrategy::new(StrategyId::PatternMatch, Behavior::Fail))
        .then(CountingStrategy::new(StrategyId::SemanticGeneration, Behavior::Nothing))
        .then(CountingStrategy::new(StrategyId::WebSearch, Behavior::Fail))
        .then(CountingStrategy::new(StrategyId::ContextAware, Behavior::Nothing));
    let h = harness(chain, fast_settings());

    let result = h.service.resolve(&stressed("qwzx")).await;

    assert_eq!(result.strategy, StrategyId::Fallback);
    assert!(!result.success);
    assert!(!result.candidates.is_empty());
    assert_eq!(result.attempts.len(), 6);
    assert!(h.cortex.top_patterns(10).await.unwrap().is_empty());
    assert_eq!(h.analytics.len(), 1);
}

#[tokio::test]
async fn test_empty_chain_still_answers() {
    let h = harness(StrategyChain::new(), fast_settings());
    let request = ShoppingRequest::new("", EmotionReading::neutral());

    let result = h.service.resolve(&request).await;

    assert_eq!(result.strategy, StrategyId::Fallback);
    assert!(!result.candidates.is_empty());
}

#[tokio::test]
async fn test_success_is_learned_and_recorded() {
    let tier = CountingStrategy::new(
        StrategyId::SemanticGeneration,
        Behavior::Found(vec![
            raw("Aroma Diffuser", "home-decoration", 1499.0),
            raw("Face Mist", "skin-care", 399.0),
        ]),
    );
    let h = harness(StrategyChain::new().then(tier), fast_settings());

    h.service.resolve(&stressed("relax after work ₹2000")).await;

    let pattern = h
        .cortex
        .recall("relax after work", "stressed")
        .await
        .unwrap()
        .expect("pattern learned");
    assert_eq!(pattern.success_count, 1);
    assert_eq!(
        pattern.categories,
        vec!["home-decoration".to_string(), "skin-care".to_string()]
    );

    let records = h.analytics.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].strategy, StrategyId::SemanticGeneration);
    assert_eq!(records[0].candidate_count, 2);
    assert!(records[0].success);
}

#[tokio::test]
async fn test_perfect_match_feedback_reinforces_pattern() {
    let h = harness(StrategyChain::new(), fast_settings());

    for kind in [FeedbackKind::PerfectMatch, FeedbackKind::Good, FeedbackKind::PerfectMatch] {
        h.service
            .record_feedback(FeedbackSubmission {
                request_text: "cozy reading corner".into(),
                emotion: EmotionReading::new("tired", 0.6),
                product_name: "Floor Lamp".into(),
                kind,
                strategy: Some(StrategyId::SemanticGeneration),
                categories: vec!["home-decoration".into()],
            })
            .await
            .unwrap();
    }

    let pattern = h
        .cortex
        .recall("cozy reading corner", "tired")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pattern.success_count, 2);

    let summary = h.service.recorder().summary(1).await.unwrap();
    let perfect: usize = summary
        .feedback
        .iter()
        .filter(|f| f.kind == FeedbackKind::PerfectMatch)
        .map(|f| f.count)
        .sum();
    assert_eq!(perfect, 2);
}

#[tokio::test]
async fn test_uncategorized_wins_are_not_learned() {
    let tier = CountingStrategy::new(
        StrategyId::SemanticGeneration,
        Behavior::Found(vec![raw("Mystery Box", "general", 499.0)]),
    );
    let h = harness(StrategyChain::new().then(tier), fast_settings());

    let result = h.service.resolve(&stressed("surprise me")).await;

    assert_eq!(result.strategy, StrategyId::SemanticGeneration);
    assert!(h.cortex.recall("surprise me", "stressed").await.unwrap().is_none());
    assert_eq!(h.analytics.records().len(), 1);
}

// ============================================================================
// Standard chain end to end
// ============================================================================

/// Answers free-text and ambient briefs with three products and counts calls
#[derive(Default)]
struct ScriptedGenerator {
    free_text_calls: AtomicUsize,
    category_calls: AtomicUsize,
}

#[async_trait]
impl ProductGenerator for ScriptedGenerator {
    async fn generate(&self, brief: &GenerationBrief) -> Result<Vec<RawCandidate>, CapabilityError> {
        match &brief.kind {
            BriefKind::FreeText { .. } => {
                self.free_text_calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![
                    raw("Aromatherapy Diffuser", "home-decoration", 1499.0),
                    raw("Noise Cancelling Earbuds", "electronics", 3999.0),
                    raw("Chamomile Tea Box", "groceries", 349.0),
                ])
            }
            BriefKind::Categories { categories } => {
                self.category_calls.fetch_add(1, Ordering::SeqCst);
                Ok(categories
                    .iter()
                    .map(|c| raw(&format!("Bestseller in {}", c), c, 999.0))
                    .collect())
            }
            BriefKind::Ambient { .. } => Ok(Vec::new()),
        }
    }
}

struct OfflineSearch;

#[async_trait]
impl WebSearch for OfflineSearch {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>, CapabilityError> {
        Err(CapabilityError::NotConfigured("no credentials".into()))
    }
}

struct StandardHarness {
    service: ResolutionService,
    generator: Arc<ScriptedGenerator>,
    directory: Arc<InMemoryBusinessDirectory>,
}

fn standard_harness() -> StandardHarness {
    let cortex: Arc<dyn CortexService> = Arc::new(StandardCortexService::new(
        Arc::new(InMemoryPatternRepository::new()),
        Arc::new(NullEventBus),
    ));
    let directory = Arc::new(InMemoryBusinessDirectory::new());
    let generator = Arc::new(ScriptedGenerator::default());
    let chain = StrategyChain::standard(ChainDependencies {
        directory: directory.clone(),
        cortex: cortex.clone(),
        catalog: generator.clone(),
        generator: generator.clone(),
        search: Arc::new(OfflineSearch),
        pattern_min_successes: 2,
    });
    let recorder = AnalyticsRecorder::new(Arc::new(InMemoryAnalyticsLog::new()), cortex.clone());
    let service = ResolutionService::builder(chain, cortex, recorder)
        .settings(fast_settings())
        .build();
    StandardHarness {
        service,
        generator,
        directory,
    }
}

#[tokio::test]
async fn test_stressed_request_resolves_by_semantic_generation() {
    let h = standard_harness();

    let result = h
        .service
        .resolve(&stressed("I need something to relax after a stressful week"))
        .await;

    assert_eq!(result.strategy, StrategyId::SemanticGeneration);
    assert_eq!(result.candidates.len(), 3);
    assert_eq!(result.attempts[0].strategy, StrategyId::LocalBusiness);
    assert_eq!(result.attempts[1].strategy, StrategyId::PatternMatch);
}

#[tokio::test]
async fn test_repeated_request_switches_to_pattern_match() {
    let h = standard_harness();
    let text = "I need something to relax after a stressful week";

    for _ in 0..3 {
        let result = h.service.resolve(&stressed(text)).await;
        assert_eq!(result.strategy, StrategyId::SemanticGeneration);
    }
    assert_eq!(h.generator.free_text_calls.load(Ordering::SeqCst), 3);

    let result = h.service.resolve(&stressed(text)).await;

    assert_eq!(result.strategy, StrategyId::PatternMatch);
    assert_eq!(h.generator.free_text_calls.load(Ordering::SeqCst), 3);
    assert_eq!(h.generator.category_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_local_business_listing_wins_first() {
    let h = standard_harness();
    h.directory
        .add(BusinessProduct::register(NewBusinessProduct {
            business_name: "Calm Corner".into(),
            business_email: "hello@calmcorner.in".into(),
            name: "Lavender Soy Candle".into(),
            description: "Hand-poured in Pune".into(),
            price: Price::inr(450.0).unwrap(),
            category: "home-decoration".into(),
            target_emotions: vec!["stressed".into()],
            stock: 20,
        }))
        .await
        .unwrap();

    let result = h
        .service
        .resolve(&stressed("looking for a candle to calm down"))
        .await;

    assert_eq!(result.strategy, StrategyId::LocalBusiness);
    assert_eq!(result.candidates[0].seller.as_deref(), Some("Calm Corner"));
    assert_eq!(h.generator.free_text_calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Learning loop through web search and a fixed-vocabulary catalog
// ============================================================================

/// Knows only the catalog slugs and keeps every category brief it receives
#[derive(Default)]
struct RecordingCatalog {
    briefs: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl ProductGenerator for RecordingCatalog {
    async fn generate(&self, brief: &GenerationBrief) -> Result<Vec<RawCandidate>, CapabilityError> {
        match &brief.kind {
            BriefKind::Categories { categories } => {
                self.briefs.lock().unwrap().push(categories.clone());
                Ok(categories
                    .iter()
                    .filter(|c| is_catalog_category(c))
                    .map(|c| raw(&format!("Catalog pick in {}", c), c, 1299.0))
                    .collect())
            }
            _ => Err(CapabilityError::Unsupported("category briefs only".into())),
        }
    }

    fn serves_category(&self, category: &str) -> bool {
        is_catalog_category(category)
    }
}

/// Generators that never come up with anything
struct SilentGenerator;

#[async_trait]
impl ProductGenerator for SilentGenerator {
    async fn generate(&self, _brief: &GenerationBrief) -> Result<Vec<RawCandidate>, CapabilityError> {
        Ok(Vec::new())
    }
}

struct ListingSearch;

#[async_trait]
impl WebSearch for ListingSearch {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>, CapabilityError> {
        Ok(vec![
            SearchHit {
                title: "Anti-Slip Yoga Mat | Shop".into(),
                snippet: "Now ₹899 with free delivery".into(),
                link: "https://shop.example.in/mat".into(),
            },
            SearchHit {
                title: "Cork Yoga Mat - Store".into(),
                snippet: "Rs. 1,499 only".into(),
                link: "https://store.example.in/cork".into(),
            },
            SearchHit {
                title: "Travel Yoga Mat".into(),
                snippet: "costs 650 rupees".into(),
                link: "https://travel.example.in/mat".into(),
            },
        ])
    }
}

fn web_search_service() -> (ResolutionService, Arc<RecordingCatalog>, Arc<dyn CortexService>) {
    let cortex: Arc<dyn CortexService> = Arc::new(StandardCortexService::new(
        Arc::new(InMemoryPatternRepository::new()),
        Arc::new(NullEventBus),
    ));
    let catalog = Arc::new(RecordingCatalog::default());
    let chain = StrategyChain::standard(ChainDependencies {
        directory: Arc::new(InMemoryBusinessDirectory::new()),
        cortex: cortex.clone(),
        catalog: catalog.clone(),
        generator: Arc::new(SilentGenerator),
        search: Arc::new(ListingSearch),
        pattern_min_successes: 2,
    });
    let recorder = AnalyticsRecorder::new(Arc::new(InMemoryAnalyticsLog::new()), cortex.clone());
    let service = ResolutionService::builder(chain, cortex.clone(), recorder)
        .settings(fast_settings())
        .build();
    (service, catalog, cortex)
}

fn excited(text: &str) -> ShoppingRequest {
    ShoppingRequest::new(text, EmotionReading::new("excited", 0.9))
}

#[tokio::test]
async fn test_web_search_wins_teach_the_pattern_tier_real_categories() {
    let (service, catalog, _) = web_search_service();
    let text = "need a new yoga mat for morning practice";

    for _ in 0..3 {
        let result = service.resolve(&excited(text)).await;
        assert_eq!(result.strategy, StrategyId::WebSearch);
    }
    assert!(catalog.briefs.lock().unwrap().is_empty());

    let result = service.resolve(&excited(text)).await;

    assert_eq!(result.strategy, StrategyId::PatternMatch);
    let briefs = catalog.briefs.lock().unwrap().clone();
    assert_eq!(briefs, vec![vec!["sports-accessories".to_string()]]);
}

#[tokio::test]
async fn test_pattern_tier_only_asks_for_catalog_categories() {
    let (service, catalog, cortex) = web_search_service();
    let text = "gift for my sister";
    let remembered = vec![
        "web-search-result".to_string(),
        "general".to_string(),
        "womens-jewellery".to_string(),
    ];
    for _ in 0..3 {
        cortex.learn(text, "excited", &remembered).await.unwrap();
    }

    let result = service.resolve(&excited(text)).await;

    assert_eq!(result.strategy, StrategyId::PatternMatch);
    let briefs = catalog.briefs.lock().unwrap().clone();
    assert_eq!(briefs.len(), 1);
    assert!(briefs[0].iter().all(|c| is_catalog_category(c)));
    assert_eq!(briefs[0], vec!["womens-jewellery".to_string()]);
}
