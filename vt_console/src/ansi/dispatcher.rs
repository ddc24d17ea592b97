// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Predicate based dispatch of [`Token`]s to many callers sharing one input stream.
//!
//! Callers ask for "the next token matching P". Tokens that nobody has taken are kept in
//! a pending queue in arrival order. At most one caller, the *active producer*, reads
//! from the [`TokenScanner`] at a time. Every other caller parks on a [`Condvar`] and
//! rescans the queue each time the producer publishes something.
//!
//! ```text
//! caller A: claim(CSI R).wait() ─┐                  ┌─► [BTS "x"] ─► caller B
//!                                ├─► dispatcher ────┤
//! caller B: next()              ─┘  (one producer)  └─► CSI R [3;4] ─► caller A
//! ```
//!
//! # Claims
//!
//! A catch-all caller (the line editor) matches everything, including the reply to a
//! query another thread sent to the terminal. A [`TokenClaim`] reserves the tokens its
//! predicate matches: whichever caller is producing hands a matching token to the
//! open claim before testing its own predicate. Register the claim *before* sending the
//! query, then [`TokenClaim::wait`] for the reply.
//!
//! # Guarantees
//!
//! - A token is delivered to exactly one caller, and never dropped.
//! - Each caller receives the earliest available token its predicate matches.
//! - Stream and protocol errors go to the caller that was producing when they happened.
//!   Parked callers are woken and one of them becomes the next producer.

use crate::{ConsoleError, CsiSequence, ProtocolError, StdMutex, Token, TokenKind,
            TokenScanner};
use std::{collections::VecDeque,
          sync::{Arc, Condvar, MutexGuard, PoisonError}};

pub type SharedPredicate = Arc<dyn Fn(&Token) -> bool + Send + Sync>;

/// A token together with its position in the scanned stream.
#[derive(Debug)]
struct Arrival {
    seq: u64,
    token: Token,
}

struct OpenClaim {
    ticket: u64,
    predicate: SharedPredicate,
    delivered: Option<Arrival>,
}

#[derive(Default)]
struct DispatchState {
    pending: VecDeque<Arrival>,
    producer_active: bool,
    claims: Vec<OpenClaim>,
    next_ticket: u64,
    next_seq: u64,
}

impl DispatchState {
    fn take_first_match(
        &mut self,
        predicate: &mut dyn FnMut(&Token) -> bool,
    ) -> Option<Token> {
        let index = self.pending.iter().position(|it| predicate(&it.token))?;
        self.pending.remove(index).map(|it| it.token)
    }

    fn stamp(&mut self, token: Token) -> Arrival {
        let seq = self.next_seq;
        self.next_seq += 1;
        Arrival { seq, token }
    }

    /// Append, merging consecutive byte runs so the queue stays short while a status
    /// query waits behind fast typing. Runs separated by a token that a claim still
    /// holds are not merged, so that token can go back between them.
    fn enqueue(&mut self, arrival: Arrival) {
        let back_seq = self.pending.back().map(|it| it.seq);
        if let Some(back_seq) = back_seq
            && !self.holds_delivery_after(back_seq)
            && let (
                Some(Arrival {
                    token: Token::ByteRun(last),
                    ..
                }),
                Token::ByteRun(bytes),
            ) = (self.pending.back_mut(), &arrival.token)
        {
            last.extend_from_slice(bytes);
            return;
        }
        self.pending.push_back(arrival);
    }

    fn holds_delivery_after(&self, seq: u64) -> bool {
        self.claims
            .iter()
            .any(|it| it.delivered.as_ref().is_some_and(|d| d.seq > seq))
    }

    /// Give `arrival` to the oldest open claim (other than `except`) that matches it.
    fn hand_to_claim(
        &mut self,
        arrival: Arrival,
        except: Option<u64>,
    ) -> Result<u64, Arrival> {
        let maybe_claim = self.claims.iter_mut().find(|it| {
            Some(it.ticket) != except
                && it.delivered.is_none()
                && (it.predicate)(&arrival.token)
        });
        match maybe_claim {
            Some(claim) => {
                claim.delivered = Some(arrival);
                Ok(claim.ticket)
            }
            None => Err(arrival),
        }
    }

    fn take_delivery(&mut self, ticket: u64) -> Option<Token> {
        self.claims
            .iter_mut()
            .find(|it| it.ticket == ticket)
            .and_then(|it| it.delivered.take())
            .map(|it| it.token)
    }

    fn register_claim(&mut self, predicate: SharedPredicate) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.claims.push(OpenClaim {
            ticket,
            predicate,
            delivered: None,
        });
        ticket
    }

    /// A delivery nobody picked up goes back into the queue at its arrival position.
    fn unregister_claim(&mut self, ticket: u64) {
        if let Some(index) = self.claims.iter().position(|it| it.ticket == ticket) {
            let claim = self.claims.remove(index);
            if let Some(arrival) = claim.delivered {
                let at = self
                    .pending
                    .iter()
                    .position(|it| it.seq > arrival.seq)
                    .unwrap_or(self.pending.len());
                self.pending.insert(at, arrival);
            }
        }
    }
}

pub struct TokenDispatcher {
    state: StdMutex<DispatchState>,
    wakeup: Condvar,
    /// Only locked by the active producer.
    scanner: StdMutex<TokenScanner>,
}

impl std::fmt::Debug for TokenDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("TokenDispatcher")
            .field("pending", &state.pending)
            .field("producer_active", &state.producer_active)
            .field("open_claims", &state.claims.len())
            .finish_non_exhaustive()
    }
}

/// Clears the active producer flag and wakes every parked caller, on every exit path.
struct ProducerGuard<'a> {
    dispatcher: &'a TokenDispatcher,
}

impl Drop for ProducerGuard<'_> {
    fn drop(&mut self) {
        self.dispatcher.lock_state().producer_active = false;
        self.dispatcher.wakeup.notify_all();
    }
}

/// Reservation of the tokens matching a predicate, see the [module docs](self).
/// Dropping it without [`Self::wait`] releases the reservation.
pub struct TokenClaim<'a> {
    dispatcher: &'a TokenDispatcher,
    ticket: u64,
    predicate: SharedPredicate,
}

impl std::fmt::Debug for TokenClaim<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClaim")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

impl TokenClaim<'_> {
    /// Block until a token matching the claim arrives.
    ///
    /// # Errors
    ///
    /// See [`TokenDispatcher::next_matching`].
    pub fn wait(self) -> Result<Token, ConsoleError> {
        let predicate = Arc::clone(&self.predicate);
        self.dispatcher
            .dispatch(&mut |it| predicate(it), Some(self.ticket))
    }

    /// [`Self::wait`] for a claim made with [`TokenDispatcher::claim_csi`].
    ///
    /// # Errors
    ///
    /// See [`TokenDispatcher::next_matching`]. A claim whose predicate accepted some
    /// other kind of token gives a [`ProtocolError`] for its first byte.
    pub fn wait_csi(self) -> Result<CsiSequence, ConsoleError> {
        match self.wait()? {
            Token::Csi(csi) => Ok(csi),
            other => Err(ProtocolError {
                byte: other.to_bytes().first().copied().unwrap_or_default(),
                expected: "CSI sequence",
            }
            .into()),
        }
    }
}

impl Drop for TokenClaim<'_> {
    fn drop(&mut self) { self.dispatcher.lock_state().unregister_claim(self.ticket); }
}

impl TokenDispatcher {
    #[must_use]
    pub fn new(scanner: TokenScanner) -> Self {
        Self {
            state: StdMutex::new(DispatchState::default()),
            wakeup: Condvar::new(),
            scanner: StdMutex::new(scanner),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of produced tokens that no caller has taken yet.
    #[must_use]
    pub fn pending_len(&self) -> usize { self.lock_state().pending.len() }

    /// Number of registered [`TokenClaim`]s.
    #[must_use]
    pub fn open_claims(&self) -> usize { self.lock_state().claims.len() }

    /// Block until a token satisfying `predicate` is available and return it.
    ///
    /// `predicate` is only called on this thread, possibly many times, on queued and
    /// freshly scanned tokens.
    ///
    /// # Errors
    ///
    /// Returns the scanner's error when this caller is the active producer and the
    /// source fails or sends a malformed sequence.
    pub fn next_matching(
        &self,
        mut predicate: impl FnMut(&Token) -> bool,
    ) -> Result<Token, ConsoleError> {
        self.dispatch(&mut predicate, None)
    }

    /// Next token of any kind that no open claim reserves.
    ///
    /// # Errors
    ///
    /// See [`Self::next_matching`].
    pub fn next(&self) -> Result<Token, ConsoleError> { self.next_matching(|_| true) }

    /// Next token of the given kind.
    ///
    /// # Errors
    ///
    /// See [`Self::next_matching`].
    pub fn next_kind(&self, kind: TokenKind) -> Result<Token, ConsoleError> {
        self.next_matching(|it| it.kind() == kind)
    }

    /// Reserve the tokens matching `predicate` until the returned claim is waited on or
    /// dropped.
    pub fn claim(
        &self,
        predicate: impl Fn(&Token) -> bool + Send + Sync + 'static,
    ) -> TokenClaim<'_> {
        let predicate: SharedPredicate = Arc::new(predicate);
        let ticket = self.lock_state().register_claim(Arc::clone(&predicate));
        TokenClaim {
            dispatcher: self,
            ticket,
            predicate,
        }
    }

    /// Reserve the next CSI sequence whose final character is `final_char`.
    pub fn claim_csi(&self, final_char: u8) -> TokenClaim<'_> {
        self.claim(move |it| it.is_csi_with_final(final_char))
    }

    /// Next CSI sequence whose final character is `final_char`, reserved against
    /// concurrent catch-all callers from the moment this is called.
    ///
    /// # Errors
    ///
    /// See [`Self::next_matching`].
    pub fn next_csi(&self, final_char: u8) -> Result<CsiSequence, ConsoleError> {
        self.claim_csi(final_char).wait_csi()
    }

    fn dispatch(
        &self,
        predicate: &mut dyn FnMut(&Token) -> bool,
        ticket: Option<u64>,
    ) -> Result<Token, ConsoleError> {
        let mut state = self.lock_state();
        loop {
            if let Some(token) = ticket.and_then(|it| state.take_delivery(it)) {
                return Ok(token);
            }
            if let Some(token) = state.take_first_match(predicate) {
                return Ok(token);
            }
            if !state.producer_active {
                break;
            }
            state = self
                .wakeup
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.producer_active = true;
        drop(state);
        let _producer_guard = ProducerGuard { dispatcher: self };

        let mut scanner = self.scanner.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            let token = scanner.next_token().inspect_err(|err| {
                tracing::debug!(%err, "token producer failed");
            })?;
            let mut state = self.lock_state();
            let arrival = state.stamp(token);
            let arrival = match state.hand_to_claim(arrival, ticket) {
                Ok(claim_ticket) => {
                    tracing::trace!(claim_ticket, "handed token to open claim");
                    drop(state);
                    self.wakeup.notify_all();
                    continue;
                }
                Err(arrival) => arrival,
            };
            if predicate(&arrival.token) {
                return Ok(arrival.token);
            }
            tracing::trace!(
                kind = %arrival.token.kind(),
                "queued token for another caller"
            );
            state.enqueue(arrival);
            drop(state);
            self.wakeup.notify_all();
        }
    }
}
