/// Receives solver events and may steer the solve.
///
/// A solver calls `observe` after every step. Returning `Some(action)`
/// requests a solver-specific action, such as stopping early; `None` lets the
/// solver continue.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is the
/// observer that never acts.
pub trait Observer<E, A> {
    /// Observes a solver event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive<Obs>(mut observer: Obs, events: &[u32]) -> Option<&'static str>
    where
        Obs: Observer<u32, &'static str>,
    {
        events.iter().find_map(|event| observer.observe(event))
    }

    #[test]
    fn closure_can_request_an_action() {
        let mut seen = Vec::new();
        let action = drive(
            |event: &u32| {
                seen.push(*event);
                (*event == 3).then_some("stop")
            },
            &[1, 2, 3, 4],
        );

        assert_eq!(action, Some("stop"));
        assert_eq!(seen, [1, 2, 3]);
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), &[1, 2, 3]), None);
    }
}
