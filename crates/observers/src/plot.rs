//! Plotting observer for visualizing fixed-point iteration.
//!
//! See [`PlotObserver`] and [`Plottable`] for usage.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use fixpoint_core::Observer;
use fixpoint_solvers::fixed_point;

/// Configuration for rendering a [`PlotObserver`] result.
///
/// ```ignore
/// obs.show(ShowConfig::new().title("x = cos(x)").legend().log_y())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShowConfig {
    title: Option<String>,
    legend: bool,
    log_y: bool,
}

impl ShowConfig {
    /// Creates a config with no title, no legend and a linear y-axis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Labels each series in a legend.
    #[must_use]
    pub fn legend(mut self) -> Self {
        self.legend = true;
        self
    }

    /// Plots log₁₀ of each y value. Non-positive values are dropped.
    #[must_use]
    pub fn log_y(mut self) -> Self {
        self.log_y = true;
        self
    }
}

/// Extracts plottable data from a solver event.
///
/// Return `None` from [`x`][Plottable::x] to skip the event, or `None` in a
/// series slot to skip just that series.
pub trait Plottable<const N: usize> {
    /// The x-axis value for this event.
    fn x(&self) -> Option<f64>;

    /// The y-axis value of each series.
    fn series(&self) -> [Option<f64>; N];
}

/// Plots a fixed-point step as `x`, `g(x)` and error against the iteration.
///
/// This is the same view as the `x_values`, `g_values` and `errors` columns
/// of a [`Trace`](fixed_point::Trace).
impl Plottable<3> for fixed_point::Event<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn x(&self) -> Option<f64> {
        Some(self.iter() as f64)
    }

    fn series(&self) -> [Option<f64>; 3] {
        [Some(self.x()), Some(self.gx()), Some(self.error())]
    }
}

/// An observer that collects series during a solve and displays them via egui.
///
/// Pass `&mut PlotObserver` as the solver's observer, then call
/// [`show`][PlotObserver::show] once the solve returns:
///
/// ```ignore
/// let mut obs = PlotObserver::new(["x", "g(x)", "Error"]);
/// fixed_point::solve(&g, 1.0, &config, &mut obs)?;
/// obs.show(ShowConfig::new().title("Newton-like").legend())?;
/// ```
///
/// Events that do not implement [`Plottable`] can still be recorded from a
/// closure observer with [`record`][PlotObserver::record].
pub struct PlotObserver<const N: usize> {
    names: [String; N],
    data: [Vec<[f64; 2]>; N],
}

impl<const N: usize> PlotObserver<N> {
    /// Creates an empty observer with one named series per slot.
    pub fn new(names: [&str; N]) -> Self {
        Self {
            names: names.map(str::to_owned),
            data: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Records one point in each series whose value is `Some`.
    pub fn record(&mut self, x: f64, series: [Option<f64>; N]) {
        for (points, y) in self.data.iter_mut().zip(series) {
            if let Some(y) = y {
                points.push([x, y]);
            }
        }
    }

    /// Returns the points recorded for series `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[must_use]
    pub fn points(&self, index: usize) -> &[[f64; 2]] {
        &self.data[index]
    }

    /// Opens a blocking egui window showing every series.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(self, config: ShowConfig) -> Result<(), eframe::Error> {
        let title = config.title.unwrap_or_default();
        let series: Vec<(String, Vec<[f64; 2]>)> = self.names.into_iter().zip(self.data).collect();

        eframe::run_native(
            &title,
            eframe::NativeOptions::default(),
            Box::new(move |_cc| {
                Ok(Box::new(PlotApp {
                    series,
                    legend: config.legend,
                    log_y: config.log_y,
                }))
            }),
        )
    }
}

impl<const N: usize, E, A> Observer<E, A> for PlotObserver<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(x) = event.x() {
            self.record(x, event.series());
        }
        None
    }
}

impl<const N: usize, E, A> Observer<E, A> for &mut PlotObserver<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}

struct PlotApp {
    series: Vec<(String, Vec<[f64; 2]>)>,
    legend: bool,
    log_y: bool,
}

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut plot = Plot::new("fixed_point_plot").x_axis_label("Iteration");
            if self.legend {
                plot = plot.legend(Legend::default());
            }
            if self.log_y {
                plot = plot.y_axis_label("log₁₀");
            }
            let log_y = self.log_y;
            plot.show(ui, |plot_ui| {
                for (name, points) in &self.series {
                    let plot_points: PlotPoints = if log_y {
                        points
                            .iter()
                            .filter(|p| p[1] > 0.0)
                            .map(|p| [p[0], p[1].log10()])
                            .collect()
                    } else {
                        points.iter().copied().collect()
                    };
                    plot_ui.line(Line::new(plot_points).name(name));
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use fixpoint_core::Model;
    use fixpoint_solvers::fixed_point::{Action, Config};

    /// g(x) = (x + 4/x) / 2, converging to 2.
    struct Heron;

    impl Model for Heron {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Infallible> {
            Ok(0.5 * (input + 4.0 / input))
        }
    }

    #[test]
    fn records_one_point_per_step_in_each_series() {
        let mut obs = PlotObserver::new(["x", "g(x)", "Error"]);
        let config = Config::new(50, 1e-10).expect("valid config");
        let solution = fixed_point::solve(&Heron, 1.0, &config, &mut obs).expect("should solve");

        let columns = solution.trace.columns();
        let along = |index: usize| -> Vec<f64> { obs.points(index).iter().map(|p| p[1]).collect() };
        assert_eq!(along(0), columns.x_values);
        assert_eq!(along(1), columns.g_values);
        assert_eq!(along(2), columns.errors);
        assert_eq!(obs.points(0)[0], [1.0, 1.0]);
    }

    #[test]
    fn record_skips_missing_values() {
        let mut obs = PlotObserver::new(["a", "b"]);
        obs.record(1.0, [Some(10.0), None]);
        obs.record(2.0, [None, Some(20.0)]);
        assert_eq!(obs.points(0), [[1.0, 10.0]]);
        assert_eq!(obs.points(1), [[2.0, 20.0]]);
    }

    #[test]
    fn never_returns_an_action() {
        let mut obs = PlotObserver::new(["x", "g(x)", "Error"]);
        let record = fixed_point::Record {
            iter: 1,
            x: 1.0,
            gx: 2.0,
            error: 1.0,
        };
        let event = fixed_point::Event {
            record: &record,
            converged: false,
        };
        let action: Option<Action> = obs.observe(&event);
        assert!(action.is_none());
    }
}
