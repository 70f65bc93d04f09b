//! Crate-level tests: settlement flows against the in-memory store, store
//! commit semantics, HTTP mapping and the conservation property.

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use kernel::id::{CryptoNetworkId, UserId};

    use crate::application::SettlementConfig;
    use crate::domain::entity::{CryptoNetwork, NewCryptoNetwork, Wallet};
    use crate::domain::repository::CryptoNetworkRepository;
    use crate::domain::value_object::Coins;
    use crate::infra::{MemoryNotificationSink, MemorySettlementRepository};

    pub fn config() -> Arc<SettlementConfig> {
        Arc::new(SettlementConfig::default())
    }

    pub fn coins(n: i64) -> Coins {
        Coins::new(n).unwrap()
    }

    pub fn stores() -> (MemorySettlementRepository, MemoryNotificationSink) {
        (MemorySettlementRepository::new(), MemoryNotificationSink::new())
    }

    /// Register an active TRC20 network
    pub async fn network(repo: &MemorySettlementRepository) -> CryptoNetworkId {
        let network = CryptoNetwork::create(NewCryptoNetwork {
            name: "TRC20".into(),
            network: "TRON".into(),
            wallet_address: "TXyz123".into(),
            ..Default::default()
        })
        .unwrap();
        repo.save_network(&network).await.unwrap();
        network.id
    }

    /// Persist a wallet with the given available balances
    pub async fn funded(repo: &MemorySettlementRepository, mining: i64, purchase: i64) -> UserId {
        let user_id = UserId::new();
        let mut wallet = Wallet::new(user_id);
        if mining > 0 {
            wallet.add_mining_coins(coins(mining)).unwrap();
        }
        if purchase > 0 {
            wallet.add_purchase_coins(coins(purchase)).unwrap();
        }
        repo.seed_wallet(wallet).await;
        user_id
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;

    #[test]
    fn test_default_config() {
        let config = SettlementConfig::default();

        assert_eq!(config.coins_per_currency_unit, 10);
        assert_eq!(config.min_deposit, 100);
        assert_eq!(config.max_deposit, 100_000);
        assert_eq!(config.max_commit_attempts, 3);
    }

    #[test]
    fn test_validated_rejects_unusable_settings() {
        let zero_rate = SettlementConfig {
            coins_per_currency_unit: 0,
            ..Default::default()
        };
        assert!(zero_rate.validated().is_err());

        let inverted = SettlementConfig {
            min_deposit: 500,
            max_deposit: 100,
            ..Default::default()
        };
        assert!(inverted.validated().is_err());

        let no_attempts = SettlementConfig {
            max_commit_attempts: 0,
            ..Default::default()
        };
        assert!(no_attempts.validated().is_err());

        assert!(SettlementConfig::default().validated().is_ok());
    }

    #[test]
    fn test_deposit_range_is_inclusive() {
        let config = SettlementConfig::default();

        assert!(config.deposit_in_range(100));
        assert!(config.deposit_in_range(100_000));
        assert!(!config.deposit_in_range(99));
        assert!(!config.deposit_in_range(100_001));
    }
}

#[cfg(test)]
mod withdrawal_tests {
    use std::sync::Arc;

    use kernel::id::{AdminId, TransactionId};

    use super::support::*;
    use crate::application::*;
    use crate::domain::repository::{TransactionRepository, WalletRepository};
    use crate::domain::value_object::{LockAllocation, TransactionStatus, WalletType};
    use crate::error::WalletError;

    fn approve(transaction_id: TransactionId) -> ApproveWithdrawalInput {
        ApproveWithdrawalInput {
            transaction_id,
            admin_id: AdminId::new(),
            external_transaction_id: Some("PAYOUT-1".into()),
            notes: None,
        }
    }

    fn reject(transaction_id: TransactionId, reason: Option<&str>) -> RejectWithdrawalInput {
        RejectWithdrawalInput {
            transaction_id,
            admin_id: AdminId::new(),
            reason: reason.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_scenario_a_request_then_approve() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 500, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let output = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 200,
            })
            .await
            .unwrap();

        assert_eq!(output.transaction.status(), TransactionStatus::Pending);
        assert_eq!(output.wallet.mining().available(), 300);
        assert_eq!(output.wallet.mining().locked(), 200);

        let review = ReviewWithdrawalUseCase::new(Arc::new(repo.clone()), Arc::new(sink.clone()), config());
        let tx = review.approve(approve(output.transaction.id)).await.unwrap();

        assert_eq!(tx.status(), TransactionStatus::Completed);
        assert_eq!(tx.external_transaction_id(), Some("PAYOUT-1"));
        assert!(tx.processed_at().is_some());

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 300);
        assert_eq!(wallet.mining().locked(), 0);
        assert_eq!(wallet.total_withdrawn(), 200);

        let delivered = sink.delivered().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "Withdrawal Approved");
    }

    #[tokio::test]
    async fn test_scenario_b_reject_refunds() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 500, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let output = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 200,
            })
            .await
            .unwrap();

        let review = ReviewWithdrawalUseCase::new(Arc::new(repo.clone()), Arc::new(sink.clone()), config());
        let tx = review
            .reject(reject(output.transaction.id, Some("bank details invalid")))
            .await
            .unwrap();

        assert_eq!(tx.status(), TransactionStatus::Failed);
        assert_eq!(tx.failure_reason(), Some("bank details invalid"));

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 500);
        assert_eq!(wallet.mining().locked(), 0);
        assert_eq!(wallet.total_withdrawn(), 0);

        let delivered = sink.delivered().await;
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].message.contains("bank details invalid"));
    }

    #[tokio::test]
    async fn test_insufficient_funds_creates_nothing() {
        let (repo, _) = stores();
        let user_id = funded(&repo, 100, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let err = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 101,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WalletError::InsufficientFunds {
                requested: 101,
                available: 100
            }
        ));
        assert_eq!(repo.transaction_count().await, 0);
        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 100);
        assert_eq!(wallet.mining().locked(), 0);
    }

    #[tokio::test]
    async fn test_user_without_wallet_has_nothing_to_withdraw() {
        let (repo, _) = stores();

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let err = request
            .execute(RequestWithdrawalInput {
                user_id: kernel::id::UserId::new(),
                wallet_type: WalletType::Auto,
                coins: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::InsufficientFunds { .. }));
    }

    #[tokio::test]
    async fn test_non_positive_coins_rejected() {
        let (repo, _) = stores();
        let user_id = funded(&repo, 100, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        for coins in [0, -5] {
            let err = request
                .execute(RequestWithdrawalInput {
                    user_id,
                    wallet_type: WalletType::Mining,
                    coins,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, WalletError::InvalidAmount(_)));
        }
    }

    #[tokio::test]
    async fn test_second_review_is_rejected_and_changes_nothing() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 500, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let tx_id = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 200,
            })
            .await
            .unwrap()
            .transaction
            .id;

        let review = ReviewWithdrawalUseCase::new(Arc::new(repo.clone()), Arc::new(sink.clone()), config());
        review.approve(approve(tx_id)).await.unwrap();
        let after_first = repo.find_wallet(&user_id).await.unwrap().unwrap();

        let err = review.approve(approve(tx_id)).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidState(_)));

        let err = review.reject(reject(tx_id, Some("late"))).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidState(_)));

        let after_second = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(after_first, after_second);
        assert_eq!(sink.delivered().await.len(), 1);
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 500, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let tx_id = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 50,
            })
            .await
            .unwrap()
            .transaction
            .id;

        let review = ReviewWithdrawalUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());
        for reason in [None, Some("   ")] {
            let err = review.reject(reject(tx_id, reason)).await.unwrap_err();
            assert!(matches!(err, WalletError::ReasonRequired));
        }

        let tx = repo.find_transaction(&tx_id).await.unwrap().unwrap();
        assert_eq!(tx.status(), TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_not_found() {
        let (repo, sink) = stores();
        let review = ReviewWithdrawalUseCase::new(Arc::new(repo), Arc::new(sink), config());

        let err = review.approve(approve(TransactionId::new())).await.unwrap_err();
        assert!(matches!(err, WalletError::NotFound("Transaction")));
    }

    #[tokio::test]
    async fn test_auto_split_refunds_each_sub_wallet_exactly() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 300, 400).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let output = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Auto,
                coins: 500,
            })
            .await
            .unwrap();

        assert_eq!(
            output.transaction.lock_allocation,
            Some(LockAllocation {
                mining: 300,
                purchase: 200
            })
        );
        assert_eq!(output.wallet.mining().locked(), 300);
        assert_eq!(output.wallet.purchase().locked(), 200);

        let review = ReviewWithdrawalUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());
        review
            .reject(reject(output.transaction.id, Some("limit exceeded")))
            .await
            .unwrap();

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 300);
        assert_eq!(wallet.purchase().available(), 400);
        assert_eq!(wallet.total_locked(), 0);
    }

    #[tokio::test]
    async fn test_auto_split_approval_commits_both_sub_wallets() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 300, 400).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let tx_id = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Auto,
                coins: 500,
            })
            .await
            .unwrap()
            .transaction
            .id;

        let review = ReviewWithdrawalUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());
        review.approve(approve(tx_id)).await.unwrap();

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 0);
        assert_eq!(wallet.purchase().available(), 200);
        assert_eq!(wallet.total_locked(), 0);
        assert_eq!(wallet.total_withdrawn(), 500);
    }

    #[tokio::test]
    async fn test_legacy_auto_withdrawal_without_allocation() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 0, 400).await;

        // A row written before allocations were recorded
        let mut wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        let allocation = wallet.lock_coins(WalletType::Purchase, coins(150)).unwrap();
        repo.seed_wallet(wallet).await;
        let mut legacy = crate::domain::entity::Transaction::withdrawal(
            user_id,
            WalletType::Auto,
            coins(150),
            allocation,
        );
        legacy.lock_allocation = None;
        let tx_id = legacy.id;
        repo.seed_transaction(legacy).await;

        let review = ReviewWithdrawalUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());
        review.reject(reject(tx_id, Some("legacy refund"))).await.unwrap();

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.purchase().available(), 400);
        assert_eq!(wallet.purchase().locked(), 0);
    }

    #[tokio::test]
    async fn test_review_rejects_other_transaction_types() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 0, 0).await;

        let earnings = CreditEarningsUseCase::new(Arc::new(repo.clone()), config());
        let mined = earnings
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "session-1".into(),
                earned_coins: 40,
            })
            .await
            .unwrap()
            .unwrap();

        let review = ReviewWithdrawalUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());
        let err = review.approve(approve(mined.id)).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_settlement() {
        let repo = crate::infra::MemorySettlementRepository::new();
        let user_id = funded(&repo, 500, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let tx_id = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 200,
            })
            .await
            .unwrap()
            .transaction
            .id;

        let review = ReviewWithdrawalUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(crate::infra::MemoryNotificationSink::failing()),
            config(),
        );
        let tx = review.approve(approve(tx_id)).await.unwrap();

        assert_eq!(tx.status(), TransactionStatus::Completed);
        let stored = repo.find_transaction(&tx_id).await.unwrap().unwrap();
        assert_eq!(stored.status(), TransactionStatus::Completed);
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::sync::Arc;

    use kernel::id::AdminId;

    use super::support::*;
    use crate::application::*;
    use crate::domain::repository::{
        Changeset, SettlementStore, TransactionRepository, WalletRepository,
    };
    use crate::domain::value_object::{ReviewReason, WalletType};
    use crate::error::WalletError;

    #[tokio::test]
    async fn test_retry_absorbs_transient_conflicts() {
        let (repo, _) = stores();
        let user_id = funded(&repo, 100, 0).await;
        repo.inject_conflicts(2).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let output = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 60,
            })
            .await
            .unwrap();

        assert_eq!(output.wallet.mining().locked(), 60);
        assert_eq!(repo.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let (repo, _) = stores();
        let user_id = funded(&repo, 100, 0).await;
        repo.inject_conflicts(3).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let err = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 60,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::ConcurrentModification));
        assert_eq!(repo.transaction_count().await, 0);
        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().locked(), 0);
    }

    #[tokio::test]
    async fn test_stale_wallet_version_is_refused() {
        let (repo, _) = stores();
        let user_id = funded(&repo, 100, 0).await;

        let mut first = repo.find_wallet(&user_id).await.unwrap().unwrap();
        let mut second = first.clone();
        first.add_purchase_coins(coins(10)).unwrap();
        second.add_purchase_coins(coins(20)).unwrap();

        repo.commit(Changeset::new().with_wallet(first)).await.unwrap();
        let err = repo
            .commit(Changeset::new().with_wallet(second))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::ConcurrentModification));

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.purchase().available(), 10);
    }

    #[tokio::test]
    async fn test_losing_review_discards_its_wallet_write() {
        let (repo, _) = stores();
        let user_id = funded(&repo, 500, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let tx_id = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 200,
            })
            .await
            .unwrap()
            .transaction
            .id;

        // Both reviewers read the same pending record
        let pending = repo.find_transaction(&tx_id).await.unwrap().unwrap();
        let mut approved = pending.clone();
        approved.complete(AdminId::new(), None, None).unwrap();
        let mut rejected = pending;
        rejected
            .fail(AdminId::new(), &ReviewReason::new(Some("dup")).unwrap())
            .unwrap();

        let mut approve_wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        approve_wallet
            .commit_locked_coins(WalletType::Mining, coins(200))
            .unwrap();
        repo.commit(
            Changeset::new()
                .with_wallet(approve_wallet)
                .settle_transaction(approved),
        )
        .await
        .unwrap();

        // the loser read the wallet after the winner committed
        let mut reject_wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        reject_wallet.add_mining_coins(coins(1)).unwrap();
        let err = repo
            .commit(
                Changeset::new()
                    .with_wallet(reject_wallet)
                    .settle_transaction(rejected),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidState(_)));

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 300);
        assert_eq!(wallet.mining().locked(), 0);
        assert_eq!(wallet.total_withdrawn(), 200);
    }

    #[tokio::test]
    async fn test_concurrent_approvals_commit_once() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 500, 0).await;

        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        let tx_id = request
            .execute(RequestWithdrawalInput {
                user_id,
                wallet_type: WalletType::Mining,
                coins: 200,
            })
            .await
            .unwrap()
            .transaction
            .id;

        let review = Arc::new(ReviewWithdrawalUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(sink.clone()),
            config(),
        ));
        let input = ApproveWithdrawalInput {
            transaction_id: tx_id,
            admin_id: AdminId::new(),
            external_transaction_id: None,
            notes: None,
        };

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let review = review.clone();
                let input = input.clone();
                tokio::spawn(async move { review.approve(input).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(
                    e,
                    WalletError::InvalidState(_) | WalletError::ConcurrentModification
                )),
            }
        }

        assert_eq!(successes, 1);
        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 300);
        assert_eq!(wallet.mining().locked(), 0);
        assert_eq!(wallet.total_withdrawn(), 200);
        assert_eq!(sink.delivered().await.len(), 1);
    }
}

#[cfg(test)]
mod payment_proof_tests {
    use std::sync::Arc;

    use kernel::id::{AdminId, PaymentProofId, UserId};

    use super::support::*;
    use crate::application::*;
    use crate::domain::entity::NotificationType;
    use crate::domain::repository::{
        PaymentProofRepository, TransactionFilter, TransactionRepository, WalletRepository,
    };
    use crate::domain::value_object::{ProofStatus, TransactionStatus, TransactionType};
    use crate::error::WalletError;
    use crate::infra::{MemoryNotificationSink, MemorySettlementRepository};
    use kernel::page::PageRequest;

    fn submission(user_id: UserId, utr: &str) -> SubmitPaymentProofInput {
        SubmitPaymentProofInput {
            user_id,
            utr: utr.into(),
            amount: 100,
            coins_to_credit: Some(1000),
            screenshot_ref: Some("uploads/proof.png".into()),
            coin_package: None,
        }
    }

    fn submit_use_case(
        repo: &MemorySettlementRepository,
        sink: &MemoryNotificationSink,
    ) -> SubmitPaymentProofUseCase<MemorySettlementRepository, MemoryNotificationSink> {
        SubmitPaymentProofUseCase::new(Arc::new(repo.clone()), Arc::new(sink.clone()), config())
    }

    fn review_use_case(
        repo: &MemorySettlementRepository,
        sink: &MemoryNotificationSink,
    ) -> ReviewPaymentProofUseCase<MemorySettlementRepository, MemoryNotificationSink> {
        ReviewPaymentProofUseCase::new(Arc::new(repo.clone()), Arc::new(sink.clone()), config())
    }

    fn approval(proof_id: PaymentProofId) -> ApprovePaymentInput {
        ApprovePaymentInput {
            proof_id,
            admin_id: AdminId::new(),
            notes: Some("matched bank statement".into()),
        }
    }

    #[tokio::test]
    async fn test_submit_notifies_user() {
        let (repo, sink) = stores();
        let user_id = UserId::new();

        let proof = submit_use_case(&repo, &sink)
            .execute(submission(user_id, "TXN123"))
            .await
            .unwrap();

        assert_eq!(proof.status(), ProofStatus::Pending);
        assert_eq!(proof.coins_to_credit, 1000);

        let delivered = sink.delivered().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "Payment Submitted");
        assert_eq!(delivered[0].notification_type, NotificationType::System);
    }

    #[tokio::test]
    async fn test_scenario_c_approve_credits_once() {
        let (repo, sink) = stores();
        let user_id = UserId::new();

        let proof = submit_use_case(&repo, &sink)
            .execute(submission(user_id, "TXN123"))
            .await
            .unwrap();

        let review = review_use_case(&repo, &sink);
        let output = review.approve(approval(proof.id)).await.unwrap();

        assert_eq!(output.proof.status(), ProofStatus::Approved);
        assert!(output.proof.reviewed_at().is_some());
        let tx = output.transaction.unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Purchase);
        assert_eq!(tx.status(), TransactionStatus::Completed);
        assert_eq!(tx.payment_proof_id, Some(proof.id));
        assert_eq!(tx.amount, 100);
        assert_eq!(tx.coins, 1000);

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.purchase().available(), 1000);

        // submitted + approved
        let delivered = sink.delivered().await;
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[1].title, "Payment Approved");

        let err = review.approve(approval(proof.id)).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidState(_)));

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.purchase().available(), 1000);
        let purchases = repo
            .list_transactions(
                &TransactionFilter {
                    user_id: Some(user_id),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(purchases.total, 1);
    }

    #[tokio::test]
    async fn test_scenario_d_duplicate_utr_rejected() {
        let (repo, sink) = stores();
        let submit = submit_use_case(&repo, &sink);

        submit.execute(submission(UserId::new(), "TXN123")).await.unwrap();
        let err = submit
            .execute(submission(UserId::new(), "  TXN123  "))
            .await
            .unwrap_err();

        match err {
            WalletError::DuplicateReference(msg) => assert_eq!(msg, DUPLICATE_UTR_MESSAGE),
            other => panic!("expected DuplicateReference, got {other:?}"),
        }

        let proofs = repo.list_proofs(None, PageRequest::default()).await.unwrap();
        assert_eq!(proofs.total, 1);
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let (repo, sink) = stores();
        let submit = submit_use_case(&repo, &sink);
        let user_id = UserId::new();

        let err = submit.execute(submission(user_id, "   ")).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidInput(_)));

        let mut input = submission(user_id, "UTR-1");
        input.screenshot_ref = None;
        let err = submit.execute(input).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidInput(_)));

        let mut input = submission(user_id, "UTR-2");
        input.amount = 99;
        let err = submit.execute(input).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));

        let mut input = submission(user_id, "UTR-3");
        input.amount = 0;
        let err = submit.execute(input).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));

        assert!(sink.delivered().await.is_empty());
    }

    #[tokio::test]
    async fn test_coins_default_from_rate() {
        let (repo, sink) = stores();
        let mut input = submission(UserId::new(), "UTR-RATE");
        input.amount = 250;
        input.coins_to_credit = None;

        let proof = submit_use_case(&repo, &sink).execute(input).await.unwrap();
        assert_eq!(proof.coins_to_credit, 2500);
    }

    #[tokio::test]
    async fn test_reject_closes_proof_without_credit() {
        let (repo, sink) = stores();
        let user_id = UserId::new();
        let proof = submit_use_case(&repo, &sink)
            .execute(submission(user_id, "UTR-REJ"))
            .await
            .unwrap();

        let review = review_use_case(&repo, &sink);
        let err = review
            .reject(RejectPaymentInput {
                proof_id: proof.id,
                admin_id: AdminId::new(),
                reason: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::ReasonRequired));

        let rejected = review
            .reject(RejectPaymentInput {
                proof_id: proof.id,
                admin_id: AdminId::new(),
                reason: Some("UTR not found in statement".into()),
            })
            .await
            .unwrap();

        assert_eq!(rejected.status(), ProofStatus::Rejected);
        assert_eq!(rejected.rejection_reason(), Some("UTR not found in statement"));
        assert!(repo.find_wallet(&user_id).await.unwrap().is_none());

        let err = review.approve(approval(proof.id)).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_approval_is_all_or_nothing() {
        let (repo, sink) = stores();
        let user_id = UserId::new();
        let proof = submit_use_case(&repo, &sink)
            .execute(submission(user_id, "UTR-ATOMIC"))
            .await
            .unwrap();

        repo.inject_conflicts(3).await;
        let err = review_use_case(&repo, &sink)
            .approve(approval(proof.id))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::ConcurrentModification));

        let stored = repo.find_proof(&proof.id).await.unwrap().unwrap();
        assert_eq!(stored.status(), ProofStatus::Pending);
        assert!(repo.find_wallet(&user_id).await.unwrap().is_none());
        assert_eq!(repo.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_proof_is_not_found() {
        let (repo, sink) = stores();
        let err = review_use_case(&repo, &sink)
            .approve(approval(PaymentProofId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::NotFound("Payment proof")));
    }
}

#[cfg(test)]
mod crypto_deposit_tests {
    use std::sync::Arc;

    use kernel::id::{AdminId, CryptoNetworkId, UserId};

    use super::support::*;
    use crate::application::*;
    use crate::domain::entity::CryptoNetworkChanges;
    use crate::domain::repository::{CryptoNetworkRepository, TransactionRepository, WalletRepository};
    use crate::domain::value_object::{TransactionStatus, WalletType};
    use crate::error::WalletError;

    fn deposit(network_id: CryptoNetworkId, user_id: UserId, tx_hash: &str) -> RecordCryptoDepositInput {
        RecordCryptoDepositInput {
            user_id,
            amount: 50,
            coins: None,
            network_id,
            tx_hash: tx_hash.into(),
        }
    }

    #[tokio::test]
    async fn test_record_then_approve_credits_purchase() {
        let (repo, sink) = stores();
        let network_id = network(&repo).await;
        let user_id = UserId::new();
        let use_case = CryptoDepositUseCase::new(Arc::new(repo.clone()), Arc::new(sink.clone()), config());

        let pending = use_case.record(deposit(network_id, user_id, "0xabc")).await.unwrap();
        assert_eq!(pending.status(), TransactionStatus::Pending);
        assert_eq!(pending.amount, 50);
        assert_eq!(pending.crypto_network_id, Some(network_id));
        assert_eq!(
            pending.description.as_deref(),
            Some("Crypto deposit - USDT via TRC20 (TRON)")
        );
        assert_eq!(pending.coins, 500);
        assert_eq!(pending.wallet_type, WalletType::Purchase);
        assert!(repo.find_wallet(&user_id).await.unwrap().is_none());

        let approved = use_case
            .approve(ApproveCryptoDepositInput {
                transaction_id: pending.id,
                admin_id: AdminId::new(),
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(approved.status(), TransactionStatus::Completed);

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.purchase().available(), 500);
        assert_eq!(wallet.mining().available(), 0);

        let delivered = sink.delivered().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "Crypto Deposit Approved");
    }

    #[tokio::test]
    async fn test_duplicate_tx_hash_rejected() {
        let (repo, sink) = stores();
        let network_id = network(&repo).await;
        let use_case = CryptoDepositUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());

        use_case.record(deposit(network_id, UserId::new(), "0xdup")).await.unwrap();
        let err = use_case
            .record(deposit(network_id, UserId::new(), "0xdup"))
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::DuplicateReference(_)));
        assert_eq!(repo.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_reject_leaves_wallet_alone() {
        let (repo, sink) = stores();
        let network_id = network(&repo).await;
        let user_id = UserId::new();
        let use_case = CryptoDepositUseCase::new(Arc::new(repo.clone()), Arc::new(sink.clone()), config());

        let pending = use_case.record(deposit(network_id, user_id, "0xrej")).await.unwrap();
        let rejected = use_case
            .reject(RejectCryptoDepositInput {
                transaction_id: pending.id,
                admin_id: AdminId::new(),
                reason: Some("transfer not found on chain".into()),
            })
            .await
            .unwrap();

        assert_eq!(rejected.status(), TransactionStatus::Failed);
        assert!(repo.find_wallet(&user_id).await.unwrap().is_none());
        assert_eq!(sink.delivered().await[0].title, "Crypto Deposit Rejected");

        let err = use_case
            .approve(ApproveCryptoDepositInput {
                transaction_id: pending.id,
                admin_id: AdminId::new(),
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_record_validation() {
        let (repo, sink) = stores();
        let network_id = network(&repo).await;
        let use_case = CryptoDepositUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());

        let input = deposit(network_id, UserId::new(), &"f".repeat(129));
        assert!(matches!(
            use_case.record(input).await.unwrap_err(),
            WalletError::InvalidInput(_)
        ));

        let input = deposit(network_id, UserId::new(), "");
        assert!(matches!(
            use_case.record(input).await.unwrap_err(),
            WalletError::InvalidInput(_)
        ));

        let mut input = deposit(network_id, UserId::new(), "0x2");
        input.amount = -1;
        assert!(matches!(
            use_case.record(input).await.unwrap_err(),
            WalletError::InvalidAmount(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_network_is_not_found() {
        let (repo, sink) = stores();
        let use_case = CryptoDepositUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());

        let err = use_case
            .record(deposit(CryptoNetworkId::new(), UserId::new(), "0xnone"))
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::NotFound("Crypto network")));
        assert_eq!(repo.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_inactive_network_refuses_deposits() {
        let (repo, sink) = stores();
        let network_id = network(&repo).await;
        let registry = CryptoNetworkUseCase::new(Arc::new(repo.clone()));
        registry
            .update(
                network_id,
                CryptoNetworkChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
                AdminId::new(),
            )
            .await
            .unwrap();
        let use_case = CryptoDepositUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());

        let err = use_case
            .record(deposit(network_id, UserId::new(), "0xoff"))
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::InvalidInput(_)));
        assert_eq!(repo.transaction_count().await, 0);
        assert!(registry.list(true).await.unwrap().is_empty());
        assert_eq!(registry.list(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_network_keeps_recorded_deposits() {
        let (repo, sink) = stores();
        let network_id = network(&repo).await;
        let use_case = CryptoDepositUseCase::new(Arc::new(repo.clone()), Arc::new(sink), config());
        let recorded = use_case
            .record(deposit(network_id, UserId::new(), "0xkeep"))
            .await
            .unwrap();

        let registry = CryptoNetworkUseCase::new(Arc::new(repo.clone()));
        registry.delete(network_id, AdminId::new()).await.unwrap();

        assert!(repo.find_network(&network_id).await.unwrap().is_none());
        let kept = repo.find_transaction(&recorded.id).await.unwrap().unwrap();
        assert_eq!(kept.amount, 50);
        assert!(kept.crypto_network_id.is_none());
        assert!(matches!(
            registry.delete(network_id, AdminId::new()).await.unwrap_err(),
            WalletError::NotFound(_)
        ));
    }
}

#[cfg(test)]
mod earnings_tests {
    use std::sync::Arc;

    use kernel::id::{AdminId, UserId};

    use super::support::*;
    use crate::application::*;
    use crate::domain::repository::WalletRepository;
    use crate::error::WalletError;

    #[tokio::test]
    async fn test_mining_session_credits_and_counts_mined() {
        let (repo, _) = stores();
        let user_id = UserId::new();
        let use_case = CreditEarningsUseCase::new(Arc::new(repo.clone()), config());

        let tx = use_case
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "s-1".into(),
                earned_coins: 75,
            })
            .await
            .unwrap();
        assert!(tx.is_some());

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 75);
        assert_eq!(wallet.total_mined(), 75);

        let err = use_case
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "s-1".into(),
                earned_coins: 75,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::DuplicateReference(_)));

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 75);
    }

    #[tokio::test]
    async fn test_zero_earnings_is_noop_and_negative_rejected() {
        let (repo, _) = stores();
        let user_id = UserId::new();
        let use_case = CreditEarningsUseCase::new(Arc::new(repo.clone()), config());

        let none = use_case
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "s-0".into(),
                earned_coins: 0,
            })
            .await
            .unwrap();
        assert!(none.is_none());
        assert!(repo.find_wallet(&user_id).await.unwrap().is_none());

        let err = use_case
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "s-neg".into(),
                earned_coins: -3,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_referral_bonus_skips_mined_total() {
        let (repo, _) = stores();
        let user_id = UserId::new();
        let use_case = CreditEarningsUseCase::new(Arc::new(repo.clone()), config());

        use_case
            .referral_bonus(ReferralBonusInput {
                referrer_id: user_id,
                referral_id: "ref-9".into(),
                coins: 30,
                admin_id: AdminId::new(),
            })
            .await
            .unwrap();

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        assert_eq!(wallet.mining().available(), 30);
        assert_eq!(wallet.total_mined(), 0);
    }

    #[tokio::test]
    async fn test_overlong_references_rejected() {
        let (repo, _) = stores();
        let user_id = UserId::new();
        let use_case = CreditEarningsUseCase::new(Arc::new(repo.clone()), config());

        let err = use_case
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "s".repeat(129),
                earned_coins: 10,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidInput(_)));

        let err = use_case
            .referral_bonus(ReferralBonusInput {
                referrer_id: user_id,
                referral_id: "r".repeat(129),
                coins: 10,
                admin_id: AdminId::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidInput(_)));

        assert!(repo.find_wallet(&user_id).await.unwrap().is_none());
        assert_eq!(repo.transaction_count().await, 0);

        // exactly at the limit is accepted
        use_case
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "s".repeat(128),
                earned_coins: 10,
            })
            .await
            .unwrap();
    }
}

#[cfg(test)]
mod query_tests {
    use std::sync::Arc;

    use kernel::id::UserId;
    use kernel::page::PageRequest;

    use super::support::*;
    use crate::application::*;
    use crate::domain::repository::TransactionFilter;
    use crate::domain::value_object::{TransactionStatus, TransactionType, WalletType};

    #[tokio::test]
    async fn test_empty_wallet_for_unknown_user() {
        let (repo, _) = stores();
        let user_id = UserId::new();

        let wallet = WalletQueries::new(Arc::new(repo)).wallet(user_id).await.unwrap();
        assert_eq!(wallet.user_id(), user_id);
        assert_eq!(wallet.total_available(), 0);
        assert!(!wallet.is_persisted());
    }

    #[tokio::test]
    async fn test_listing_filters_and_paginates() {
        let (repo, _) = stores();
        let user_id = funded(&repo, 1_000, 0).await;
        let request = RequestWithdrawalUseCase::new(Arc::new(repo.clone()), config());
        for _ in 0..3 {
            request
                .execute(RequestWithdrawalInput {
                    user_id,
                    wallet_type: WalletType::Mining,
                    coins: 10,
                })
                .await
                .unwrap();
        }
        let earnings = CreditEarningsUseCase::new(Arc::new(repo.clone()), config());
        earnings
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "s-q".into(),
                earned_coins: 5,
            })
            .await
            .unwrap();

        let queries = WalletQueries::new(Arc::new(repo));

        let pending = queries
            .pending_withdrawals(PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(pending.total, 3);
        assert_eq!(pending.items.len(), 2);
        assert_eq!(pending.pages(), 2);
        assert!(pending.items[0].created_at >= pending.items[1].created_at);

        let mined = queries
            .transactions(
                TransactionFilter {
                    user_id: Some(user_id),
                    transaction_type: Some(TransactionType::Mining),
                    status: Some(TransactionStatus::Completed),
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(mined.total, 1);
    }

    #[tokio::test]
    async fn test_mined_report_displays_larger_aggregate() {
        let (repo, _) = stores();
        // seeded wallet: user total 200, no session records
        let user_id = funded(&repo, 200, 0).await;
        let earnings = CreditEarningsUseCase::new(Arc::new(repo.clone()), config());
        earnings
            .mining_session_completed(MiningSessionCompletedInput {
                user_id,
                session_id: "s-r".into(),
                earned_coins: 50,
            })
            .await
            .unwrap();

        let report = WalletQueries::new(Arc::new(repo))
            .mined_report(Some(user_id))
            .await
            .unwrap();

        assert_eq!(report.session_total, 50);
        assert_eq!(report.user_total, 250);
        assert_eq!(report.displayed, 250);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::support::*;
    use crate::application::SettlementConfig;
    use crate::infra::{MemoryNotificationSink, MemorySettlementRepository};
    use crate::presentation::router::{admin_router_generic, wallet_router_generic};

    fn app(repo: &MemorySettlementRepository, sink: &MemoryNotificationSink) -> Router {
        Router::new()
            .nest(
                "/api/wallet",
                wallet_router_generic(repo.clone(), sink.clone(), SettlementConfig::default()),
            )
            .nest(
                "/api/admin",
                admin_router_generic(repo.clone(), sink.clone(), SettlementConfig::default()),
            )
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        principal: Option<(&str, String)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((header, value)) = principal {
            builder = builder.header(header, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn user(id: impl ToString) -> Option<(&'static str, String)> {
        Some(("x-user-id", id.to_string()))
    }

    fn admin() -> Option<(&'static str, String)> {
        Some(("x-admin-id", Uuid::new_v4().to_string()))
    }

    #[tokio::test]
    async fn test_withdrawal_round_trip_over_http() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 500, 0).await;
        let app = app(&repo, &sink);

        let (status, body) = send(
            &app,
            "POST",
            "/api/wallet/withdrawals",
            user(user_id),
            Some(json!({ "walletType": "mining", "coins": 200 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["wallet"]["miningLocked"], 200);
        assert_eq!(body["transaction"]["status"], "pending");
        let tx_id = body["transaction"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "GET",
            "/api/admin/transactions/withdrawals/pending",
            admin(),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total"], 1);

        let uri = format!("/api/admin/transactions/withdrawals/{tx_id}/reject");
        let (status, body) = send(&app, "PUT", &uri, admin(), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "reason_required");

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            admin(),
            Some(json!({ "reason": "bank details invalid" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "failed");

        let (status, body) = send(&app, "PUT", &uri, admin(), Some(json!({ "reason": "again" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "already_processed");

        let (status, body) = send(&app, "GET", "/api/wallet", user(user_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["miningAvailable"], 500);
        assert_eq!(body["miningLocked"], 0);
    }

    #[tokio::test]
    async fn test_principal_headers() {
        let (repo, sink) = stores();
        let app = app(&repo, &sink);

        let (status, body) = send(&app, "GET", "/api/wallet", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthenticated");

        let (status, body) = send(&app, "GET", "/api/wallet", user("not-a-uuid"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");

        let (status, _) = send(&app, "GET", "/api/admin/payments", user(Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_error_codes() {
        let (repo, sink) = stores();
        let user_id = funded(&repo, 10, 0).await;
        let app = app(&repo, &sink);

        let (status, body) = send(
            &app,
            "POST",
            "/api/wallet/withdrawals",
            user(user_id),
            Some(json!({ "walletType": "mining", "coins": 11 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "insufficient_funds");
        assert!(body["action"].is_string());

        let (status, body) = send(
            &app,
            "POST",
            "/api/wallet/withdrawals",
            user(user_id),
            Some(json!({ "coins": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_amount");

        let uri = format!("/api/admin/payments/{}", Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, admin(), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, body) = send(
            &app,
            "GET",
            "/api/admin/transactions?status=archived",
            admin(),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");

        let (status, _) = send(
            &app,
            "GET",
            "/api/admin/transactions?status=all&type=all",
            admin(),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_payment_proof_flow_over_http() {
        let (repo, sink) = stores();
        let user_id = Uuid::new_v4();
        let app = app(&repo, &sink);
        let proof = json!({
            "utr": "TXN123",
            "amount": 100,
            "coinsToCredit": 1000,
            "screenshotRef": "uploads/a.png"
        });

        let (status, body) = send(
            &app,
            "POST",
            "/api/wallet/payments/proof",
            user(user_id),
            Some(proof.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let proof_id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            "/api/wallet/payments/proof",
            user(Uuid::new_v4()),
            Some(proof),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "duplicate_reference");

        let (status, body) = send(&app, "GET", "/api/admin/payments?status=pending", admin(), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 1);

        let uri = format!("/api/admin/payments/{proof_id}/approve");
        let (status, body) = send(&app, "PUT", &uri, admin(), Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["proof"]["status"], "approved");
        assert_eq!(body["transaction"]["type"], "purchase");

        let (_, body) = send(&app, "GET", "/api/wallet", user(user_id), None).await;
        assert_eq!(body["purchaseAvailable"], 1000);
    }

    #[tokio::test]
    async fn test_earnings_and_report_over_http() {
        let (repo, sink) = stores();
        let user_id = Uuid::new_v4();
        let app = app(&repo, &sink);

        let (status, body) = send(
            &app,
            "POST",
            "/api/admin/mining/sessions/completed",
            admin(),
            Some(json!({ "userId": user_id, "sessionId": "s-http", "earnedCoins": 40 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transaction"]["type"], "mining");

        let (status, _) = send(
            &app,
            "POST",
            "/api/admin/referrals/bonus",
            admin(),
            Some(json!({ "referrerId": user_id, "referralId": "r-http", "coins": 15 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/api/admin/reports/mined-coins?userId={user_id}");
        let (status, body) = send(&app, "GET", &uri, admin(), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sessionTotal"], 40);
        assert_eq!(body["userTotal"], 40);
        assert_eq!(body["totalMined"], 40);
    }

    #[tokio::test]
    async fn test_crypto_network_crud_over_http() {
        let (repo, sink) = stores();
        let user_id = Uuid::new_v4();
        let app = app(&repo, &sink);

        let (status, body) = send(
            &app,
            "POST",
            "/api/admin/crypto-networks",
            admin(),
            Some(json!({ "name": "TRC20", "network": "TRON", "walletAddress": "TXyz123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["symbol"], "USDT");
        assert_eq!(body["isActive"], true);
        let network_id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            "/api/admin/crypto-networks",
            admin(),
            Some(json!({ "name": "ERC20", "network": "ETH" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");

        let (status, body) = send(&app, "GET", "/api/wallet/crypto-networks", user(user_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let deposit = json!({ "amount": 20, "networkId": network_id, "txHash": "0xhttp" });
        let (status, body) = send(
            &app,
            "POST",
            "/api/wallet/crypto-deposits",
            user(user_id),
            Some(deposit.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["cryptoNetworkId"], network_id.as_str());
        assert_eq!(body["amount"], 20);
        assert_eq!(body["coins"], 200);

        let uri = format!("/api/admin/crypto-networks/{network_id}");
        let (status, body) = send(&app, "PUT", &uri, admin(), Some(json!({ "isActive": false }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isActive"], false);

        let (_, body) = send(&app, "GET", "/api/wallet/crypto-networks", user(user_id), None).await;
        assert!(body.as_array().unwrap().is_empty());
        let (_, body) = send(&app, "GET", "/api/admin/crypto-networks", admin(), None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            "POST",
            "/api/wallet/crypto-deposits",
            user(user_id),
            Some(json!({ "amount": 20, "networkId": network_id, "txHash": "0xhttp2" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");

        let (status, _) = send(&app, "DELETE", &uri, admin(), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "DELETE", &uri, admin(), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, body) = send(
            &app,
            "POST",
            "/api/wallet/crypto-deposits",
            user(user_id),
            Some(json!({ "amount": 20, "networkId": network_id, "txHash": "0xhttp3" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, _) = send(&app, "GET", "/api/admin/crypto-networks", user(user_id), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[cfg(test)]
mod logging_tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use kernel::id::{AdminId, TransactionId, UserId};
    use tracing_subscriber::fmt::MakeWriter;

    use super::support::*;
    use crate::application::*;
    use crate::domain::entity::{Transaction, Wallet};
    use crate::domain::value_object::{LockAllocation, WalletType};
    use crate::error::WalletError;

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn subscriber(logs: CapturedLogs) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(logs)
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish()
    }

    #[test]
    fn test_invariant_violation_logged_when_raised() {
        let logs = CapturedLogs::default();

        let err = tracing::subscriber::with_default(subscriber(logs.clone()), || {
            Wallet::new(UserId::new())
                .unlock_mining_coins(coins(10))
                .unwrap_err()
        });

        assert!(matches!(err, WalletError::InvariantViolation(_)));
        let output = logs.contents();
        assert!(output.contains("ERROR"));
        assert!(output.contains("Wallet invariant violated"));
    }

    #[test]
    fn test_review_of_orphaned_withdrawal_logs_violation() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(subscriber(logs.clone()));

        let err = tokio_test::block_on(async {
            let (repo, sink) = stores();
            // pending withdrawal whose wallet was never stored
            let withdrawal = Transaction::withdrawal(
                UserId::new(),
                WalletType::Mining,
                coins(40),
                LockAllocation::mining(40),
            );
            let transaction_id: TransactionId = withdrawal.id;
            repo.seed_transaction(withdrawal).await;

            ReviewWithdrawalUseCase::new(Arc::new(repo), Arc::new(sink), config())
                .approve(ApproveWithdrawalInput {
                    transaction_id,
                    admin_id: AdminId::new(),
                    external_transaction_id: None,
                    notes: None,
                })
                .await
                .unwrap_err()
        });

        assert!(matches!(err, WalletError::InvariantViolation(_)));
        assert!(logs.contents().contains("Wallet invariant violated"));
    }
}

#[cfg(test)]
mod conservation_tests {
    use std::sync::Arc;

    use kernel::id::{AdminId, TransactionId, UserId};
    use proptest::prelude::*;

    use super::support::*;
    use crate::application::*;
    use crate::domain::repository::WalletRepository;
    use crate::domain::value_object::WalletType;
    use crate::infra::{MemoryNotificationSink, MemorySettlementRepository};

    #[derive(Debug, Clone)]
    enum Op {
        Mine(i64),
        Withdraw(WalletType, i64),
        Approve(usize),
        Reject(usize),
    }

    fn wallet_type_strategy() -> impl Strategy<Value = WalletType> {
        prop_oneof![
            Just(WalletType::Mining),
            Just(WalletType::Purchase),
            Just(WalletType::Auto),
        ]
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..500).prop_map(Op::Mine),
            (wallet_type_strategy(), 1i64..400).prop_map(|(wt, n)| Op::Withdraw(wt, n)),
            (0usize..8).prop_map(Op::Approve),
            (0usize..8).prop_map(Op::Reject),
        ]
    }

    /// Runs `ops` and returns (credited, withdrawn-by-approval, wallet snapshot)
    async fn run(ops: Vec<Op>) -> (u64, u64, crate::domain::entity::Wallet) {
        let repo = MemorySettlementRepository::new();
        let user_id = UserId::new();
        let seed = funded_with(&repo, user_id, 300).await;

        let repo_arc = Arc::new(repo.clone());
        let sink = Arc::new(MemoryNotificationSink::new());
        let earnings = CreditEarningsUseCase::new(repo_arc.clone(), config());
        let request = RequestWithdrawalUseCase::new(repo_arc.clone(), config());
        let review = ReviewWithdrawalUseCase::new(repo_arc, sink, config());

        let mut credited = seed;
        let mut approved = 0u64;
        let mut pending: Vec<(TransactionId, u64)> = Vec::new();

        for (i, op) in ops.into_iter().enumerate() {
            match op {
                Op::Mine(n) => {
                    earnings
                        .mining_session_completed(MiningSessionCompletedInput {
                            user_id,
                            session_id: format!("s-{i}"),
                            earned_coins: n,
                        })
                        .await
                        .unwrap();
                    credited += n as u64;
                }
                Op::Withdraw(wallet_type, n) => {
                    // refusals must leave the wallet untouched, which the
                    // final balance check covers
                    if let Ok(out) = request
                        .execute(RequestWithdrawalInput {
                            user_id,
                            wallet_type,
                            coins: n,
                        })
                        .await
                    {
                        pending.push((out.transaction.id, n as u64));
                    }
                }
                Op::Approve(idx) if !pending.is_empty() => {
                    let (tx_id, coins) = pending.remove(idx % pending.len());
                    review
                        .approve(ApproveWithdrawalInput {
                            transaction_id: tx_id,
                            admin_id: AdminId::new(),
                            external_transaction_id: None,
                            notes: None,
                        })
                        .await
                        .unwrap();
                    approved += coins;
                }
                Op::Reject(idx) if !pending.is_empty() => {
                    let (tx_id, _) = pending.remove(idx % pending.len());
                    review
                        .reject(RejectWithdrawalInput {
                            transaction_id: tx_id,
                            admin_id: AdminId::new(),
                            reason: Some("property check".into()),
                        })
                        .await
                        .unwrap();
                }
                Op::Approve(_) | Op::Reject(_) => {}
            }
        }

        let wallet = repo.find_wallet(&user_id).await.unwrap().unwrap();
        let locked: u64 = pending.iter().map(|(_, c)| c).sum();
        assert_eq!(wallet.total_locked(), locked);
        (credited, approved, wallet)
    }

    async fn funded_with(repo: &MemorySettlementRepository, user_id: UserId, purchase: i64) -> u64 {
        let mut wallet = crate::domain::entity::Wallet::new(user_id);
        wallet.add_purchase_coins(coins(purchase)).unwrap();
        repo.seed_wallet(wallet).await;
        purchase as u64
    }

    proptest! {
        #[test]
        fn prop_coins_are_conserved(ops in prop::collection::vec(op_strategy(), 1..30)) {
            let (credited, approved, wallet) = tokio_test::block_on(run(ops));

            let held = wallet.mining().total() + wallet.purchase().total();
            prop_assert_eq!(held + wallet.total_withdrawn(), credited);
            prop_assert_eq!(wallet.total_withdrawn(), approved);
        }
    }
}
