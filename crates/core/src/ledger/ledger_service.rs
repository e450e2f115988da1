use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};

use super::ledger_errors::LedgerError;
use super::ledger_model::{
    CommissionPolicy, ConversionRequest, ConversionResult, LedgerPolicy, QuotaPolicy,
};
use super::ledger_traits::LedgerServiceTrait;
use crate::balances::BalanceRepositoryTrait;
use crate::constants::COMMISSION_RATE;
use crate::errors::Result;
use crate::events::{LedgerEvent, LedgerEventSink, NoOpLedgerEventSink};
use crate::fx::{Currency, RateLookupTrait};
use crate::quota::QuotaRepositoryTrait;

/// The conversion orchestrator.
///
/// Owns the whole flow: quota accounting, positive-balance guard, rate
/// lookup, settlement of both balances, and outcome reporting. The balance
/// store and quota tracker are mutated only through this service.
pub struct LedgerService {
    user_id: String,
    balances: Arc<dyn BalanceRepositoryTrait>,
    quota: Arc<dyn QuotaRepositoryTrait>,
    rates: Arc<dyn RateLookupTrait>,
    policy: LedgerPolicy,
    event_sink: Arc<dyn LedgerEventSink>,
}

impl LedgerService {
    pub fn new(
        user_id: impl Into<String>,
        balances: Arc<dyn BalanceRepositoryTrait>,
        quota: Arc<dyn QuotaRepositoryTrait>,
        rates: Arc<dyn RateLookupTrait>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            balances,
            quota,
            rates,
            policy: LedgerPolicy::default(),
            event_sink: Arc::new(NoOpLedgerEventSink),
        }
    }

    /// Sets the quota/commission policy for this service.
    pub fn with_policy(mut self, policy: LedgerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the event sink for this service.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn LedgerEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    fn commission_for(amount: Decimal) -> Decimal {
        amount * COMMISSION_RATE
    }

    /// Rounding used in user-facing messages only; persisted values are
    /// never rounded.
    fn round_for_display(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    fn negative_balance_message(currency: Currency) -> String {
        format!(
            "Current {} balance must not reach negative",
            currency.display_name()
        )
    }

    fn settled_message(
        amount: Decimal,
        from: Currency,
        converted_amount: Decimal,
        to: Currency,
        commission: Option<Decimal>,
    ) -> String {
        let mut message = format!(
            "You have converted {} {} to {} {}.",
            Self::round_for_display(amount),
            from.code(),
            converted_amount,
            to.code()
        );
        if let Some(fee) = commission {
            message.push_str(&format!(
                " Commission Fee - {} {}.",
                Self::round_for_display(fee),
                from.code()
            ));
        }
        message
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn convert(&self, request: ConversionRequest) -> Result<ConversionResult> {
        let ConversionRequest { amount, from, to } = request;

        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount.to_string()).into());
        }

        // Guard. The quota is touched exactly once per attempt and the
        // result is reused below; under ConsumeOnCheck the unit spent here
        // is not rolled back on rejection.
        let free_remaining = match self.policy.quota {
            QuotaPolicy::ConsumeOnCheck => self.quota.consume_free_transfer(&self.user_id).await?,
            QuotaPolicy::ConsumeOnSettle => self.quota.peek_free_transfers(&self.user_id)?,
        };

        // The hold applies the commission to the requested amount, not to
        // the converted amount.
        let hold = if free_remaining > 0 {
            Decimal::ZERO
        } else {
            amount + Self::commission_for(amount)
        };

        let current_balance = self.balances.get_balance(&self.user_id, from)?;
        if current_balance - hold < Decimal::ZERO {
            return Ok(ConversionResult::rejected(Self::negative_balance_message(
                from,
            )));
        }

        // Lookup. Any failure is reported uniformly; no retry. Quota
        // consumption from the guard stands.
        let quote = match self.rates.lookup(amount, from, to).await {
            Ok(quote) => quote,
            Err(e) => {
                log::error!("Rate lookup failed for {} {} -> {}: {}", amount, from, to, e);
                return Ok(ConversionResult::rejected("Error transferring funds"));
            }
        };

        // Settlement. Re-read both balances, then persist the debit and the
        // credit. No transaction wraps the two writes; a failure of the
        // second leaves the ledger inconsistent and is surfaced as fatal.
        if quote.currency == from {
            return Ok(ConversionResult::rejected(format!(
                "Conversion resolved to the source currency {}",
                from.code()
            )));
        }

        let from_before = self.balances.get_balance(&self.user_id, from)?;
        let to_before = self.balances.get_balance(&self.user_id, quote.currency)?;

        let commission =
            (free_remaining == 0).then(|| Self::commission_for(amount));

        let debit = match (self.policy.commission, commission) {
            (CommissionPolicy::DebitSource, Some(fee)) => amount + fee,
            _ => amount,
        };

        let from_after = from_before - debit;
        if from_after < Decimal::ZERO {
            return Ok(ConversionResult::rejected(Self::negative_balance_message(
                from,
            )));
        }

        self.balances
            .set_balance(&self.user_id, from, from_after)
            .await?;
        self.balances
            .set_balance(&self.user_id, quote.currency, to_before + quote.amount)
            .await?;

        if let Some(fee) = commission {
            self.balances.add_commission(&self.user_id, from, fee).await?;
        }

        if self.policy.quota == QuotaPolicy::ConsumeOnSettle {
            self.quota.consume_free_transfer(&self.user_id).await?;
        }

        self.event_sink.emit(LedgerEvent::balances_changed(
            &self.user_id,
            vec![from, quote.currency],
        ));
        self.event_sink.emit(LedgerEvent::conversion_settled(
            &self.user_id,
            from,
            quote.currency,
            amount,
            quote.amount,
            commission,
        ));

        Ok(ConversionResult::settled(
            Self::settled_message(amount, from, quote.amount, quote.currency, commission),
            quote.amount,
            commission,
        ))
    }

    fn get_balance(&self, currency: Currency) -> Result<Decimal> {
        self.balances.get_balance(&self.user_id, currency)
    }

    fn get_total_commission_fees(&self, currency: Currency) -> Result<Decimal> {
        self.balances.get_commission_total(&self.user_id, currency)
    }

    fn available_currencies(&self) -> Vec<Currency> {
        Currency::all().to_vec()
    }

    fn display_name(&self, currency: Currency) -> &'static str {
        currency.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_FREE_TRANSFERS, DEFAULT_USER_ID};
    use crate::errors::Error;
    use crate::events::MockLedgerEventSink;
    use crate::fx::{FxError, RateQuote};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const USER: &str = DEFAULT_USER_ID;

    // ============== Mocks ==============

    #[derive(Default)]
    struct MockBalanceRepository {
        balances: Mutex<HashMap<(String, Currency), Decimal>>,
        commissions: Mutex<HashMap<(String, Currency), Decimal>>,
    }

    impl MockBalanceRepository {
        fn with_balance(self, currency: Currency, amount: Decimal) -> Self {
            self.balances
                .lock()
                .unwrap()
                .insert((USER.to_string(), currency), amount);
            self
        }
    }

    #[async_trait]
    impl BalanceRepositoryTrait for MockBalanceRepository {
        fn get_balance(&self, user_id: &str, currency: Currency) -> Result<Decimal> {
            Ok(self
                .balances
                .lock()
                .unwrap()
                .get(&(user_id.to_string(), currency))
                .copied()
                .unwrap_or_else(|| currency.default_balance()))
        }

        async fn set_balance(
            &self,
            user_id: &str,
            currency: Currency,
            amount: Decimal,
        ) -> Result<()> {
            self.balances
                .lock()
                .unwrap()
                .insert((user_id.to_string(), currency), amount);
            Ok(())
        }

        fn get_commission_total(&self, user_id: &str, currency: Currency) -> Result<Decimal> {
            Ok(self
                .commissions
                .lock()
                .unwrap()
                .get(&(user_id.to_string(), currency))
                .copied()
                .unwrap_or(Decimal::ZERO))
        }

        async fn add_commission(
            &self,
            user_id: &str,
            currency: Currency,
            amount: Decimal,
        ) -> Result<()> {
            *self
                .commissions
                .lock()
                .unwrap()
                .entry((user_id.to_string(), currency))
                .or_insert(Decimal::ZERO) += amount;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockQuotaRepository {
        counters: Mutex<HashMap<String, i32>>,
    }

    impl MockQuotaRepository {
        fn with_counter(self, value: i32) -> Self {
            self.counters.lock().unwrap().insert(USER.to_string(), value);
            self
        }

        fn counter(&self) -> Option<i32> {
            self.counters.lock().unwrap().get(USER).copied()
        }
    }

    #[async_trait]
    impl QuotaRepositoryTrait for MockQuotaRepository {
        async fn consume_free_transfer(&self, user_id: &str) -> Result<i32> {
            let mut counters = self.counters.lock().unwrap();
            let remaining = match counters.get(user_id).copied() {
                None => DEFAULT_FREE_TRANSFERS,
                Some(n) => (n - 1).max(0),
            };
            counters.insert(user_id.to_string(), remaining);
            Ok(remaining)
        }

        fn peek_free_transfers(&self, user_id: &str) -> Result<i32> {
            Ok(self
                .counters
                .lock()
                .unwrap()
                .get(user_id)
                .copied()
                .unwrap_or(DEFAULT_FREE_TRANSFERS))
        }
    }

    struct MockRateLookup {
        quote: Option<RateQuote>,
        calls: AtomicUsize,
    }

    impl MockRateLookup {
        fn returning(currency: Currency, amount: Decimal) -> Self {
            Self {
                quote: Some(RateQuote { amount, currency }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                quote: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateLookupTrait for MockRateLookup {
        async fn lookup(
            &self,
            _amount: Decimal,
            _from: Currency,
            _to: Currency,
        ) -> Result<RateQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.quote {
                Some(quote) => Ok(quote.clone()),
                None => Err(FxError::Request("connection refused".to_string()).into()),
            }
        }
    }

    // ============== Helpers ==============

    struct Fixture {
        service: LedgerService,
        balances: Arc<MockBalanceRepository>,
        quota: Arc<MockQuotaRepository>,
        rates: Arc<MockRateLookup>,
        sink: MockLedgerEventSink,
    }

    fn fixture(
        balances: MockBalanceRepository,
        quota: MockQuotaRepository,
        rates: MockRateLookup,
        policy: LedgerPolicy,
    ) -> Fixture {
        let balances = Arc::new(balances);
        let quota = Arc::new(quota);
        let rates = Arc::new(rates);
        let sink = MockLedgerEventSink::new();
        let service = LedgerService::new(USER, balances.clone(), quota.clone(), rates.clone())
            .with_policy(policy)
            .with_event_sink(Arc::new(sink.clone()));
        Fixture {
            service,
            balances,
            quota,
            rates,
            sink,
        }
    }

    fn eur_to_usd(amount: Decimal) -> ConversionRequest {
        ConversionRequest::new(amount, Currency::EUR, Currency::USD)
    }

    // ============== Tests ==============

    #[tokio::test]
    async fn test_free_conversion_settles_without_commission() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default(),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(result.success);
        assert_eq!(result.converted_amount, Some(dec!(110)));
        assert_eq!(result.commission_charged, None);
        assert!(!result.message.contains("Commission"));
        assert_eq!(
            fx.balances.get_balance(USER, Currency::EUR).unwrap(),
            dec!(900)
        );
        assert_eq!(
            fx.balances.get_balance(USER, Currency::USD).unwrap(),
            dec!(110)
        );
        assert_eq!(fx.rates.calls(), 1);
    }

    #[tokio::test]
    async fn test_settled_message_wording() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default(),
            MockRateLookup::returning(Currency::USD, dec!(110.53)),
            LedgerPolicy::default(),
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert_eq!(result.message, "You have converted 100 EUR to 110.53 USD.");
    }

    #[tokio::test]
    async fn test_exhausted_quota_charges_commission_in_narrative_only() {
        // Quota exhausted, balance 1000 EUR, convert 100 EUR. The hold is
        // 107 and passes; the persisted balance drops by the raw amount
        // only, while the message and result carry the 7 EUR commission.
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default().with_counter(0),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(result.success);
        assert_eq!(result.commission_charged, Some(dec!(7.00)));
        assert!(result.message.contains("Commission Fee - 7 EUR"));
        // Pinned discrepancy: the commission is never debited.
        assert_eq!(
            fx.balances.get_balance(USER, Currency::EUR).unwrap(),
            dec!(900)
        );
    }

    #[tokio::test]
    async fn test_commission_accumulates_in_commission_ledger() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default().with_counter(0),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();
        fx.service.convert(eur_to_usd(dec!(50))).await.unwrap();

        assert_eq!(
            fx.balances.get_commission_total(USER, Currency::EUR).unwrap(),
            dec!(10.50)
        );
    }

    #[tokio::test]
    async fn test_free_conversion_does_not_touch_commission_ledger() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default(),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert_eq!(
            fx.balances.get_commission_total(USER, Currency::EUR).unwrap(),
            Decimal::ZERO
        );
    }

    #[tokio::test]
    async fn test_debit_source_policy_subtracts_commission() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default().with_counter(0),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy {
                commission: CommissionPolicy::DebitSource,
                ..LedgerPolicy::default()
            },
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(result.success);
        assert_eq!(
            fx.balances.get_balance(USER, Currency::EUR).unwrap(),
            dec!(893.00)
        );
    }

    #[tokio::test]
    async fn test_insufficient_funds_rejected_before_lookup() {
        // Balance 50 EUR, quota exhausted: the hold is 107 > 50, so the
        // guard rejects without any network call or balance mutation.
        let fx = fixture(
            MockBalanceRepository::default().with_balance(Currency::EUR, dec!(50)),
            MockQuotaRepository::default().with_counter(0),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(!result.success);
        assert!(result.message.contains("Euro"));
        assert!(result.message.contains("must not reach negative"));
        assert_eq!(fx.rates.calls(), 0);
        assert_eq!(
            fx.balances.get_balance(USER, Currency::EUR).unwrap(),
            dec!(50)
        );
        assert_eq!(
            fx.balances.get_balance(USER, Currency::USD).unwrap(),
            Decimal::ZERO
        );
        assert!(fx.sink.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_attempt_burns_quota_under_consume_on_check() {
        let fx = fixture(
            MockBalanceRepository::default().with_balance(Currency::EUR, dec!(0)),
            MockQuotaRepository::default().with_counter(3),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        // A free transfer remains, so the hold is zero and the guard lets a
        // zero balance through; settlement then rejects the negative debit.
        // The quota unit spent by the guard stays spent.
        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(!result.success);
        assert_eq!(fx.quota.counter(), Some(2));
    }

    #[tokio::test]
    async fn test_rejected_attempt_keeps_quota_under_consume_on_settle() {
        let fx = fixture(
            MockBalanceRepository::default().with_balance(Currency::EUR, dec!(50)),
            MockQuotaRepository::default().with_counter(0),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy {
                quota: QuotaPolicy::ConsumeOnSettle,
                ..LedgerPolicy::default()
            },
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(!result.success);
        assert_eq!(fx.quota.counter(), Some(0));
    }

    #[tokio::test]
    async fn test_settled_conversion_consumes_quota_under_consume_on_settle() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default().with_counter(3),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy {
                quota: QuotaPolicy::ConsumeOnSettle,
                ..LedgerPolicy::default()
            },
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(result.success);
        assert_eq!(fx.quota.counter(), Some(2));
    }

    #[tokio::test]
    async fn test_lookup_failure_reported_without_mutation() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default().with_counter(3),
            MockRateLookup::failing(),
            LedgerPolicy::default(),
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Error transferring funds");
        assert_eq!(
            fx.balances.get_balance(USER, Currency::EUR).unwrap(),
            dec!(1000)
        );
        // The quota unit spent by the guard is not rolled back.
        assert_eq!(fx.quota.counter(), Some(2));
        assert!(fx.sink.is_empty());
    }

    #[tokio::test]
    async fn test_same_currency_resolution_mutates_nothing() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default(),
            MockRateLookup::returning(Currency::EUR, dec!(100)),
            LedgerPolicy::default(),
        );

        let result = fx
            .service
            .convert(ConversionRequest::new(
                dec!(100),
                Currency::EUR,
                Currency::EUR,
            ))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(
            fx.balances.get_balance(USER, Currency::EUR).unwrap(),
            dec!(1000)
        );
        assert!(fx.sink.is_empty());
    }

    #[tokio::test]
    async fn test_settlement_events_emitted_after_both_writes() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default(),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        let events = fx.sink.events();
        assert_eq!(events.len(), 2);
        match &events[0] {
            LedgerEvent::BalancesChanged { currencies, .. } => {
                assert_eq!(currencies, &[Currency::EUR, Currency::USD]);
            }
            other => panic!("Expected BalancesChanged, got {:?}", other),
        }
        match &events[1] {
            LedgerEvent::ConversionSettled {
                converted_amount,
                commission,
                ..
            } => {
                assert_eq!(*converted_amount, dec!(110));
                assert_eq!(*commission, None);
            }
            other => panic!("Expected ConversionSettled, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_an_error() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default(),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        let err = fx.service.convert(eur_to_usd(dec!(0))).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::InvalidAmount(_))));

        let err = fx.service.convert(eur_to_usd(dec!(-5))).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn test_guard_ignores_commission_while_free_transfers_remain() {
        // Full-balance conversion is allowed while a free transfer remains:
        // the hold is zero, and the settlement debit lands exactly on zero.
        let fx = fixture(
            MockBalanceRepository::default().with_balance(Currency::EUR, dec!(100)),
            MockQuotaRepository::default(),
            MockRateLookup::returning(Currency::USD, dec!(110)),
            LedgerPolicy::default(),
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(result.success);
        assert_eq!(
            fx.balances.get_balance(USER, Currency::EUR).unwrap(),
            dec!(0)
        );
    }

    #[tokio::test]
    async fn test_credit_lands_on_resolved_currency() {
        // The target balance update uses the currency resolved by the
        // lookup, not the requested one.
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default(),
            MockRateLookup::returning(Currency::JPY, dec!(16500)),
            LedgerPolicy::default(),
        );

        let result = fx.service.convert(eur_to_usd(dec!(100))).await.unwrap();

        assert!(result.success);
        assert_eq!(
            fx.balances.get_balance(USER, Currency::JPY).unwrap(),
            dec!(16500)
        );
        assert_eq!(
            fx.balances.get_balance(USER, Currency::USD).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_presentation_api() {
        let fx = fixture(
            MockBalanceRepository::default(),
            MockQuotaRepository::default(),
            MockRateLookup::failing(),
            LedgerPolicy::default(),
        );

        assert_eq!(
            fx.service.available_currencies(),
            vec![Currency::EUR, Currency::USD, Currency::JPY]
        );
        assert_eq!(fx.service.display_name(Currency::JPY), "Japanese Yen");
        assert_eq!(
            fx.service.get_balance(Currency::EUR).unwrap(),
            dec!(1000)
        );
        assert_eq!(
            fx.service.get_total_commission_fees(Currency::EUR).unwrap(),
            Decimal::ZERO
        );
    }
}
