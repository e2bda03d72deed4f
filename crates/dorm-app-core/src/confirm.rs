// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Confirmation port for destructive actions (delete, return, evict).
//!
//! Screen state asks the port before mutating; a declined prompt leaves the
//! state untouched. Adapters decide how to ask (dialog, stdin, flag).

/// A yes/no question shown before a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Dialog title.
    pub title: &'static str,
    /// Question body.
    pub text: &'static str,
    /// Label of the accepting button.
    pub confirm_label: &'static str,
    /// Render the accept action as dangerous.
    pub danger: bool,
}

impl Prompt {
    /// Asked before a saved inventory snapshot is removed.
    pub const DELETE_SNAPSHOT: Self = Self {
        title: "Видалення інвентаризації",
        text: "Видалити цей запис інвентаризації? Дію не можна скасувати.",
        confirm_label: "Видалити",
        danger: true,
    };

    /// Asked before an issued item is marked as returned.
    pub const RETURN_ITEM: Self = Self {
        title: "Повернення предмета",
        text: "Повернути цей предмет на склад?",
        confirm_label: "Повернути",
        danger: false,
    };

    /// Asked before a student is evicted.
    pub const EVICT_STUDENT: Self = Self {
        title: "Підтвердити виселення",
        text: "Виселити студента і повернути все майно на склад?",
        confirm_label: "Так, виселити",
        danger: true,
    };
}

/// Port through which state asks the user to accept or cancel.
pub trait ConfirmPort {
    /// Returns `true` when the user accepted the prompt.
    fn confirm(&self, prompt: &Prompt) -> bool;
}

impl<F> ConfirmPort for F
where
    F: Fn(&Prompt) -> bool,
{
    fn confirm(&self, prompt: &Prompt) -> bool {
        self(prompt)
    }
}

/// Accepts every prompt (non-interactive `--yes` mode).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmPort for AlwaysConfirm {
    fn confirm(&self, _prompt: &Prompt) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl ConfirmPort for NeverConfirm {
    fn confirm(&self, _prompt: &Prompt) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_ports() {
        let only_safe = |p: &Prompt| !p.danger;
        assert!(only_safe.confirm(&Prompt::RETURN_ITEM));
        assert!(!only_safe.confirm(&Prompt::EVICT_STUDENT));
    }

    #[test]
    fn fixed_answers() {
        assert!(AlwaysConfirm.confirm(&Prompt::DELETE_SNAPSHOT));
        assert!(!NeverConfirm.confirm(&Prompt::DELETE_SNAPSHOT));
    }
}
