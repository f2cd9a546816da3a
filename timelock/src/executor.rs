//! Scheduled operation store and batch runner.

use crate::error::TimelockError;
use agora_access::AccessRegistry;
use agora_types::{
    Address, Call, OperationId, OperationState, Role, TargetRegistry, TimeIndex, TimelockParams,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A scheduled batch. Executed operations keep their record forever so the
/// same id can never be armed again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOperation {
    pub id: OperationId,
    pub predecessor: OperationId,
    pub scheduled_at: TimeIndex,
    pub ready_at: TimeIndex,
    /// First index at which the operation is no longer executable.
    pub expires_at: TimeIndex,
    pub executed_at: Option<TimeIndex>,
}

impl ScheduledOperation {
    pub fn state(&self, now: TimeIndex) -> OperationState {
        if self.executed_at.is_some() {
            OperationState::Done
        } else if now < self.ready_at {
            OperationState::Waiting
        } else if now < self.expires_at {
            OperationState::Ready
        } else {
            OperationState::Expired
        }
    }
}

/// Returned by [`TimelockExecutor::schedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReceipt {
    pub id: OperationId,
    pub ready_at: TimeIndex,
    pub expires_at: TimeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockExecutor {
    address: Address,
    params: TimelockParams,
    access: AccessRegistry,
    operations: BTreeMap<OperationId, ScheduledOperation>,
}

impl TimelockExecutor {
    /// Create a timelock administered by itself and, optionally, a bootstrap `admin`.
    ///
    /// Each proposer also receives the canceller role.
    pub fn new(
        address: Address,
        params: TimelockParams,
        proposers: &[Address],
        executors: &[Address],
        admin: Option<Address>,
    ) -> Result<Self, TimelockError> {
        let mut admins = vec![address];
        admins.extend(admin);
        let mut access = AccessRegistry::new(&admins);
        for proposer in proposers {
            access.grant_role(&address, Role::Proposer, *proposer)?;
            access.grant_role(&address, Role::Canceller, *proposer)?;
        }
        for executor in executors {
            access.grant_role(&address, Role::Executor, *executor)?;
        }
        info!(
            timelock = %address,
            min_delay = params.min_delay,
            grace_period = params.grace_period,
            "timelock deployed"
        );
        Ok(Self {
            address,
            params,
            access,
            operations: BTreeMap::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn min_delay(&self) -> u64 {
        self.params.min_delay
    }

    pub fn grace_period(&self) -> u64 {
        self.params.grace_period
    }

    pub fn access(&self) -> &AccessRegistry {
        &self.access
    }

    pub fn has_role(&self, role: Role, who: &Address) -> bool {
        self.access.has_role(role, who)
    }

    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        who: Address,
    ) -> Result<bool, TimelockError> {
        Ok(self.access.grant_role(caller, role, who)?)
    }

    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        who: &Address,
    ) -> Result<bool, TimelockError> {
        Ok(self.access.revoke_role(caller, role, who)?)
    }

    pub fn renounce_role(&mut self, caller: &Address, role: Role) -> bool {
        self.access.renounce_role(caller, role)
    }

    pub fn hash_operation(calls: &[Call], predecessor: &OperationId, salt: &[u8; 32]) -> OperationId {
        agora_crypto::hash_operation(calls, predecessor, salt)
    }

    pub fn operation(&self, id: &OperationId) -> Option<&ScheduledOperation> {
        self.operations.get(id)
    }

    pub fn operation_state(&self, id: &OperationId, now: TimeIndex) -> OperationState {
        self.operations
            .get(id)
            .map_or(OperationState::Unset, |op| op.state(now))
    }

    pub fn is_operation_done(&self, id: &OperationId) -> bool {
        self.operations
            .get(id)
            .is_some_and(|op| op.executed_at.is_some())
    }

    /// Schedule `calls` to become executable after `delay`. Proposer-only.
    pub fn schedule(
        &mut self,
        caller: &Address,
        calls: &[Call],
        predecessor: OperationId,
        salt: [u8; 32],
        delay: u64,
        now: TimeIndex,
    ) -> Result<ScheduleReceipt, TimelockError> {
        self.access.check_role(Role::Proposer, caller)?;
        if calls.is_empty() {
            return Err(TimelockError::EmptyBatch);
        }
        if delay < self.params.min_delay {
            return Err(TimelockError::InsufficientDelay {
                delay,
                minimum: self.params.min_delay,
            });
        }
        let id = Self::hash_operation(calls, &predecessor, &salt);
        match self.operation_state(&id, now) {
            OperationState::Waiting | OperationState::Ready => {
                return Err(TimelockError::AlreadyScheduled(id))
            }
            OperationState::Done => return Err(TimelockError::AlreadyExecuted(id)),
            OperationState::Unset | OperationState::Expired => {}
        }
        let ready_at = now.checked_add(delay).ok_or(TimelockError::Overflow)?;
        let expires_at = ready_at
            .checked_add(self.params.grace_period)
            .ok_or(TimelockError::Overflow)?;

        self.operations.insert(
            id,
            ScheduledOperation {
                id,
                predecessor,
                scheduled_at: now,
                ready_at,
                expires_at,
                executed_at: None,
            },
        );
        info!(
            operation = %id,
            proposer = %caller,
            calls = calls.len(),
            %ready_at,
            "operation scheduled"
        );
        Ok(ScheduleReceipt {
            id,
            ready_at,
            expires_at,
        })
    }

    /// Drop a pending operation. Canceller-only. The id may be scheduled again.
    pub fn cancel(
        &mut self,
        caller: &Address,
        id: &OperationId,
        now: TimeIndex,
    ) -> Result<(), TimelockError> {
        self.access.check_role(Role::Canceller, caller)?;
        if !self.operation_state(id, now).is_pending() {
            return Err(TimelockError::NotPending(*id));
        }
        self.operations.remove(id);
        info!(operation = %id, canceller = %caller, "operation canceled");
        Ok(())
    }

    /// Run a ready batch against `targets`. Executor-only.
    ///
    /// Calls run in order against a staged copy of `targets`; the copy
    /// replaces the original only if every call succeeds. On the first
    /// failure nothing is committed and the operation stays ready, so the
    /// run can be retried.
    pub fn run<R>(
        &mut self,
        caller: &Address,
        calls: &[Call],
        predecessor: OperationId,
        salt: [u8; 32],
        now: TimeIndex,
        targets: &mut R,
    ) -> Result<OperationId, TimelockError>
    where
        R: TargetRegistry + Clone,
    {
        self.access.check_role(Role::Executor, caller)?;
        let id = Self::hash_operation(calls, &predecessor, &salt);
        let op = self
            .operations
            .get(&id)
            .ok_or(TimelockError::UnknownOperation(id))?;
        match op.state(now) {
            OperationState::Done => return Err(TimelockError::AlreadyExecuted(id)),
            OperationState::Waiting => {
                return Err(TimelockError::NotReady {
                    id,
                    ready_at: op.ready_at,
                    now,
                })
            }
            OperationState::Expired => {
                return Err(TimelockError::Expired {
                    id,
                    expired_at: op.expires_at,
                })
            }
            OperationState::Ready | OperationState::Unset => {}
        }
        if !predecessor.is_zero() && !self.is_operation_done(&predecessor) {
            return Err(TimelockError::MissingDependency(predecessor));
        }

        let mut staged = targets.clone();
        for (index, call) in calls.iter().enumerate() {
            let outcome = match staged.target_mut(&call.target) {
                Some(target) => target.invoke(&self.address, call.value, &call.payload, now),
                None => Err(agora_types::CallError::UnknownTarget(call.target)),
            };
            if let Err(source) = outcome {
                warn!(operation = %id, index, error = %source, "batch aborted");
                return Err(TimelockError::CallFailed { index, source });
            }
        }
        *targets = staged;

        if let Some(op) = self.operations.get_mut(&id) {
            op.executed_at = Some(now);
        }
        info!(operation = %id, executor = %caller, calls = calls.len(), "operation executed");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_access::AccessError;
    use agora_nullables::NullTarget;
    use agora_token::{TokenCall, VotingToken};

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    fn t(i: u64) -> TimeIndex {
        TimeIndex::new(i)
    }

    const SALT: [u8; 32] = [5u8; 32];

    fn params() -> TimelockParams {
        TimelockParams {
            min_delay: 10,
            grace_period: 100,
        }
    }

    fn timelock() -> TimelockExecutor {
        TimelockExecutor::new(
            addr("timelock"),
            params(),
            &[addr("governor")],
            &[Address::ANYONE],
            None,
        )
        .unwrap()
    }

    fn token() -> VotingToken {
        VotingToken::new(addr("token"), "MyToken", "MTK", addr("timelock"))
    }

    fn mint(amount: u128) -> Call {
        Call::new(
            addr("token"),
            0,
            TokenCall::Mint {
                to: addr("owner"),
                amount,
            }
            .encode()
            .unwrap(),
        )
    }

    #[test]
    fn only_proposers_schedule() {
        let mut tl = timelock();
        let err = tl
            .schedule(&addr("owner"), &[mint(1)], OperationId::ZERO, SALT, 10, t(0))
            .unwrap_err();
        assert_eq!(
            err,
            TimelockError::Unauthorized(AccessError::Unauthorized {
                caller: addr("owner"),
                role: Role::Proposer
            })
        );
    }

    #[test]
    fn delay_below_minimum_rejected() {
        let mut tl = timelock();
        assert_eq!(
            tl.schedule(&addr("governor"), &[mint(1)], OperationId::ZERO, SALT, 9, t(0)),
            Err(TimelockError::InsufficientDelay {
                delay: 9,
                minimum: 10
            })
        );
    }

    #[test]
    fn schedule_records_ready_time() {
        let mut tl = timelock();
        let receipt = tl
            .schedule(&addr("governor"), &[mint(1)], OperationId::ZERO, SALT, 10, t(3))
            .unwrap();
        assert_eq!(receipt.ready_at, t(13));
        assert_eq!(receipt.expires_at, t(113));
        assert_eq!(tl.operation_state(&receipt.id, t(12)), OperationState::Waiting);
        assert_eq!(tl.operation_state(&receipt.id, t(13)), OperationState::Ready);
        assert_eq!(tl.operation_state(&receipt.id, t(113)), OperationState::Expired);
    }

    #[test]
    fn double_schedule_rejected() {
        let mut tl = timelock();
        let receipt = tl
            .schedule(&addr("governor"), &[mint(1)], OperationId::ZERO, SALT, 10, t(0))
            .unwrap();
        assert_eq!(
            tl.schedule(&addr("governor"), &[mint(1)], OperationId::ZERO, SALT, 10, t(1)),
            Err(TimelockError::AlreadyScheduled(receipt.id))
        );
    }

    #[test]
    fn run_before_ready_fails_then_succeeds_once() {
        let mut tl = timelock();
        let mut token = token();
        let calls = [mint(25_000)];
        let receipt = tl
            .schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(3))
            .unwrap();

        let err = tl
            .run(&addr("anyone"), &calls, OperationId::ZERO, SALT, t(5), &mut token)
            .unwrap_err();
        assert!(matches!(err, TimelockError::NotReady { ready_at, .. } if ready_at == t(13)));
        assert_eq!(token.total_supply(), 0);

        tl.run(&addr("anyone"), &calls, OperationId::ZERO, SALT, t(13), &mut token)
            .unwrap();
        assert_eq!(token.balance_of(&addr("owner")), 25_000);
        assert!(tl.is_operation_done(&receipt.id));

        assert_eq!(
            tl.run(&addr("anyone"), &calls, OperationId::ZERO, SALT, t(14), &mut token),
            Err(TimelockError::AlreadyExecuted(receipt.id))
        );
        assert_eq!(token.balance_of(&addr("owner")), 25_000);
        assert_eq!(
            tl.schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(15)),
            Err(TimelockError::AlreadyExecuted(receipt.id))
        );
    }

    #[test]
    fn failing_call_aborts_whole_batch() {
        let mut tl = timelock();
        let mut token = token();
        let calls = [mint(5), Call::new(addr("nowhere"), 0, vec![])];
        let receipt = tl
            .schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(0))
            .unwrap();
        let err = tl
            .run(&addr("x"), &calls, OperationId::ZERO, SALT, t(10), &mut token)
            .unwrap_err();
        assert_eq!(
            err,
            TimelockError::CallFailed {
                index: 1,
                source: agora_types::CallError::UnknownTarget(addr("nowhere"))
            }
        );
        assert_eq!(token.total_supply(), 0);
        assert_eq!(tl.operation_state(&receipt.id, t(10)), OperationState::Ready);
    }

    #[test]
    fn failed_run_is_retryable() {
        let mut tl = timelock();
        let mut target = NullTarget::new(addr("target"));
        target.fail_next("paused");
        let calls = [Call::new(addr("target"), 0, vec![1]), Call::new(addr("target"), 0, vec![2])];
        tl.schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(0))
            .unwrap();

        assert!(tl
            .run(&addr("x"), &calls, OperationId::ZERO, SALT, t(10), &mut target)
            .is_err());
        assert!(target.received().is_empty());

        target.clear_failure();
        tl.run(&addr("x"), &calls, OperationId::ZERO, SALT, t(11), &mut target)
            .unwrap();
        assert_eq!(target.received().len(), 2);
        assert_eq!(target.received()[0].caller, addr("timelock"));
    }

    #[test]
    fn restricted_executor_role() {
        let mut tl = TimelockExecutor::new(
            addr("timelock"),
            params(),
            &[addr("governor")],
            &[addr("governor")],
            None,
        )
        .unwrap();
        let mut token = token();
        let calls = [mint(1)];
        tl.schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(0))
            .unwrap();
        assert!(matches!(
            tl.run(&addr("stranger"), &calls, OperationId::ZERO, SALT, t(10), &mut token),
            Err(TimelockError::Unauthorized(_))
        ));
        assert!(tl
            .run(&addr("governor"), &calls, OperationId::ZERO, SALT, t(10), &mut token)
            .is_ok());
    }

    #[test]
    fn predecessor_must_be_done() {
        let mut tl = timelock();
        let mut token = token();
        let first = [mint(1)];
        let second = [mint(2)];
        let r1 = tl
            .schedule(&addr("governor"), &first, OperationId::ZERO, SALT, 10, t(0))
            .unwrap();
        tl.schedule(&addr("governor"), &second, r1.id, SALT, 10, t(0))
            .unwrap();
        assert_eq!(
            tl.run(&addr("x"), &second, r1.id, SALT, t(10), &mut token),
            Err(TimelockError::MissingDependency(r1.id))
        );
        tl.run(&addr("x"), &first, OperationId::ZERO, SALT, t(10), &mut token)
            .unwrap();
        tl.run(&addr("x"), &second, r1.id, SALT, t(10), &mut token)
            .unwrap();
        assert_eq!(token.total_supply(), 3);
    }

    #[test]
    fn expired_operation_cannot_run_but_can_be_rescheduled() {
        let mut tl = timelock();
        let mut token = token();
        let calls = [mint(1)];
        let receipt = tl
            .schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(0))
            .unwrap();
        assert_eq!(
            tl.run(&addr("x"), &calls, OperationId::ZERO, SALT, t(110), &mut token),
            Err(TimelockError::Expired {
                id: receipt.id,
                expired_at: t(110)
            })
        );
        let again = tl
            .schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(110))
            .unwrap();
        assert_eq!(again.id, receipt.id);
        assert_eq!(again.ready_at, t(120));
    }

    #[test]
    fn cancel_frees_the_id() {
        let mut tl = timelock();
        let calls = [mint(1)];
        let receipt = tl
            .schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(0))
            .unwrap();
        assert!(tl.cancel(&addr("owner"), &receipt.id, t(1)).is_err());
        tl.cancel(&addr("governor"), &receipt.id, t(1)).unwrap();
        assert_eq!(tl.operation_state(&receipt.id, t(1)), OperationState::Unset);
        assert_eq!(
            tl.cancel(&addr("governor"), &receipt.id, t(1)),
            Err(TimelockError::NotPending(receipt.id))
        );
        assert!(tl
            .schedule(&addr("governor"), &calls, OperationId::ZERO, SALT, 10, t(2))
            .is_ok());
    }

    #[test]
    fn unknown_operation_rejected() {
        let mut tl = timelock();
        let mut token = token();
        assert!(matches!(
            tl.run(&addr("x"), &[mint(1)], OperationId::ZERO, SALT, t(0), &mut token),
            Err(TimelockError::UnknownOperation(_))
        ));
    }

    #[test]
    fn bootstrap_admin_can_be_revoked() {
        let owner = addr("owner");
        let mut tl = TimelockExecutor::new(addr("timelock"), params(), &[], &[], Some(owner)).unwrap();
        tl.grant_role(&owner, Role::Proposer, addr("governor")).unwrap();
        tl.revoke_role(&owner, Role::Admin, &owner).unwrap();
        assert!(!tl.has_role(Role::Admin, &owner));
        assert!(tl.grant_role(&owner, Role::Proposer, owner).is_err());
        assert!(tl.has_role(Role::Admin, &addr("timelock")));
    }
}
