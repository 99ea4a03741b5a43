// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Verdicts for the rate-limit and brute-force probes.
//!
//! A probe fires a bounded number of requests and feeds each status code to
//! an evaluator. The evaluator says whether to keep going and, once it has
//! seen enough, which outcome the backend produced. Keeping this free of I/O
//! lets the threshold rules be tested without a network.

use std::fmt;

/// Status the backend returns for a request over quota or a locked code.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Outcome of a quota probe (`quota` accepted requests, then one refused).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaVerdict {
    /// `quota` requests accepted, the next one refused with 429
    Enforced,
    /// 429 before the quota was used up: an earlier run already spent it
    AlreadyExhausted { at: u32 },
    /// A request inside the quota got something other than 200 or 429
    RejectedWithinQuota { at: u32, status: u16 },
    /// The request after the quota was not refused
    NotEnforced { status: u16 },
}

impl QuotaVerdict {
    /// Whether the verdict counts as a pass. An exhausted quota passes unless
    /// `strict` is set.
    pub fn passed(&self, strict: bool) -> bool {
        match self {
            Self::Enforced => true,
            Self::AlreadyExhausted { .. } => !strict,
            Self::RejectedWithinQuota { .. } | Self::NotEnforced { .. } => false,
        }
    }
}

impl fmt::Display for QuotaVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enforced => write!(f, "limit enforced"),
            Self::AlreadyExhausted { at } => {
                write!(f, "request {} refused early, quota already spent", at)
            }
            Self::RejectedWithinQuota { at, status } => {
                write!(f, "request {} should be accepted (status: {})", at, status)
            }
            Self::NotEnforced { status } => {
                write!(f, "request over quota should be refused (status: {})", status)
            }
        }
    }
}

/// Evaluates a run of `quota + 1` requests against a rate limit.
#[derive(Debug, Clone)]
pub struct QuotaProbe {
    quota: u32,
    seen: u32,
}

impl QuotaProbe {
    pub fn new(quota: u32) -> Self {
        Self { quota, seen: 0 }
    }

    /// Most requests the probe will ever ask for.
    pub fn max_requests(&self) -> u32 {
        self.quota + 1
    }

    /// 1-based index of the next request.
    pub fn next_attempt(&self) -> u32 {
        self.seen + 1
    }

    /// Feed the status of the next request. `None` means keep going.
    pub fn observe(&mut self, status: u16) -> Option<QuotaVerdict> {
        self.seen += 1;
        let at = self.seen;

        if at <= self.quota {
            match status {
                200 => None,
                TOO_MANY_REQUESTS => Some(QuotaVerdict::AlreadyExhausted { at }),
                _ => Some(QuotaVerdict::RejectedWithinQuota { at, status }),
            }
        } else if status == TOO_MANY_REQUESTS {
            Some(QuotaVerdict::Enforced)
        } else {
            Some(QuotaVerdict::NotEnforced { status })
        }
    }
}

/// Outcome of a brute-force probe (`max_failures` wrong codes, then one
/// that must be blocked).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutVerdict {
    /// Every wrong code refused, the attempt after them blocked
    Locked,
    /// A wrong code within the tolerance got an unexpected answer
    UnexpectedResponse { at: u32, status: u16 },
    /// The attempt past the tolerance was not blocked
    NotLocked { status: u16 },
}

impl LockoutVerdict {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl fmt::Display for LockoutVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "code locked"),
            Self::UnexpectedResponse { at, status } => {
                write!(f, "attempt {} should be refused as a wrong code (status: {})", at, status)
            }
            Self::NotLocked { status } => {
                write!(f, "attempt past the limit should be blocked (status: {})", status)
            }
        }
    }
}

/// Evaluates `max_failures + 1` verification attempts with wrong codes.
#[derive(Debug, Clone)]
pub struct LockoutProbe {
    max_failures: u32,
    seen: u32,
}

impl LockoutProbe {
    pub fn new(max_failures: u32) -> Self {
        Self {
            max_failures,
            seen: 0,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_failures + 1
    }

    pub fn next_attempt(&self) -> u32 {
        self.seen + 1
    }

    /// The wrong code for the next attempt: its index, zero-padded to six digits.
    pub fn next_code(&self) -> String {
        format!("{:06}", self.next_attempt())
    }

    /// Feed one attempt. `blocked_marker` is whether the body carried the
    /// lockout message. `None` means keep going.
    pub fn observe(&mut self, status: u16, blocked_marker: bool) -> Option<LockoutVerdict> {
        self.seen += 1;
        let at = self.seen;

        if at <= self.max_failures {
            match status {
                400 | 401 => None,
                _ => Some(LockoutVerdict::UnexpectedResponse { at, status }),
            }
        } else if status == TOO_MANY_REQUESTS || blocked_marker {
            Some(LockoutVerdict::Locked)
        } else {
            Some(LockoutVerdict::NotLocked { status })
        }
    }
}
