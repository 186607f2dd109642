use egui::Color32;
use egui_plot::{Bar, BarChart, Line, Plot};
use std::path::PathBuf;

use crate::accuracy::calculate_accuracy;
use crate::data::{ArsenalData, Bullet};
use crate::trajectory;

pub struct SimulatorApp {
    arsenal: Option<ArsenalData>,
    error_msg: Option<String>,

    // form state
    selected_firearm: Option<String>,
    selected_bullet: Option<String>,
    distance_input: String,
    wind_speed_input: String,
    wind_angle_input: String,
    show_trajectory: bool,

    // last simulate outcome
    accuracy_percentage: Option<f64>,
    status: Option<String>,
    trajectory_points: Option<Vec<[f64; 2]>>,
}

fn bullet_label(bullet: &Bullet) -> String {
    format!(
        "{} - {} - {} grains - {}",
        bullet.bullet_id, bullet.caliber, bullet.weight_grains, bullet.bullet_type
    )
}

impl SimulatorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let root_dir = PathBuf::from(".");
        let mut app = Self {
            arsenal: None,
            error_msg: None,
            selected_firearm: None,
            selected_bullet: None,
            distance_input: String::new(),
            wind_speed_input: String::new(),
            wind_angle_input: "0".to_owned(),
            show_trajectory: false,
            accuracy_percentage: None,
            status: None,
            trajectory_points: None,
        };

        match ArsenalData::load_from_dir(&root_dir) {
            Ok(data) => {
                app.selected_firearm = data.firearms.keys().next().cloned();
                if let Some(firearm_id) = &app.selected_firearm {
                    app.selected_bullet = data
                        .bullets_for(firearm_id)
                        .first()
                        .map(|b| b.bullet_id.clone());
                }
                app.arsenal = Some(data);
            }
            Err(e) => {
                app.error_msg = Some(format!("failed to load data: {e:#}"));
            }
        }

        app
    }

    fn ui_form(&mut self, ui: &mut egui::Ui) {
        let Some(data) = self.arsenal.as_ref() else {
            return;
        };

        ui.label("Select Firearm:");
        let firearm_text = self
            .selected_firearm
            .as_ref()
            .and_then(|id| data.firearms.get(id))
            .map(|f| format!("{} - {}", f.id, f.name))
            .unwrap_or_default();
        let previous_firearm = self.selected_firearm.clone();
        egui::ComboBox::from_id_salt("firearm")
            .width(ui.available_width())
            .selected_text(firearm_text)
            .show_ui(ui, |ui| {
                for firearm in data.firearms.values() {
                    ui.selectable_value(
                        &mut self.selected_firearm,
                        Some(firearm.id.clone()),
                        format!("{} - {}", firearm.id, firearm.name),
                    );
                }
            });
        if self.selected_firearm != previous_firearm {
            // dependent list: first bullet preselected, cleared when empty
            self.selected_bullet = self
                .selected_firearm
                .as_deref()
                .and_then(|id| data.bullets_for(id).first())
                .map(|b| b.bullet_id.clone());
        }
        if let Some(firearm) = self
            .selected_firearm
            .as_ref()
            .and_then(|id| data.firearms.get(id))
        {
            ui.small(format!("Muzzle velocity: {}", firearm.muzzle_velocity_label));
        }

        ui.add_space(6.0);
        ui.label("Select Bullet:");
        let bullets = self
            .selected_firearm
            .as_deref()
            .map(|id| data.bullets_for(id))
            .unwrap_or(&[]);
        let bullet_text = bullets
            .iter()
            .find(|b| Some(b.bullet_id.as_str()) == self.selected_bullet.as_deref())
            .map(bullet_label)
            .unwrap_or_default();
        egui::ComboBox::from_id_salt("bullet")
            .width(ui.available_width())
            .selected_text(bullet_text)
            .show_ui(ui, |ui| {
                for bullet in bullets {
                    ui.selectable_value(
                        &mut self.selected_bullet,
                        Some(bullet.bullet_id.clone()),
                        bullet_label(bullet),
                    );
                }
            });

        ui.add_space(6.0);
        ui.label("Enter Distance (m):");
        ui.text_edit_singleline(&mut self.distance_input);
        ui.label("Enter Wind Speed (m/s):");
        ui.text_edit_singleline(&mut self.wind_speed_input);
        ui.label("Enter Wind Angle (degrees):");
        ui.text_edit_singleline(&mut self.wind_angle_input);

        ui.add_space(6.0);
        ui.checkbox(&mut self.show_trajectory, "Trajectory preview");

        ui.add_space(6.0);
        let clicked = ui.button("Simulate Trajectory").clicked();

        ui.add_space(10.0);
        ui.separator();
        let accuracy_text = self
            .accuracy_percentage
            .map(|p| format!("Accuracy: {p:.2}%"))
            .unwrap_or_else(|| "Accuracy: 0.00%".to_owned());
        ui.label(accuracy_text);
        if let Some(status) = &self.status {
            ui.colored_label(Color32::YELLOW, status);
        }

        if clicked {
            self.simulate();
        }
    }

    fn simulate(&mut self) {
        self.status = None;

        let Some(data) = self.arsenal.as_ref() else {
            return;
        };
        let (Some(firearm_id), Some(bullet_id)) = (
            self.selected_firearm.as_deref(),
            self.selected_bullet.as_deref(),
        ) else {
            self.status = Some("Select a firearm and bullet first".to_owned());
            return;
        };

        let Ok(distance) = self.distance_input.trim().parse::<f64>() else {
            self.status = Some("Distance must be a number".to_owned());
            return;
        };
        let Ok(wind_speed) = self.wind_speed_input.trim().parse::<f64>() else {
            self.status = Some("Wind speed must be a number".to_owned());
            return;
        };
        // collected for the trajectory preview; the accuracy formula
        // does not consume it
        let Ok(wind_angle) = self.wind_angle_input.trim().parse::<f64>() else {
            self.status = Some("Wind angle must be a number".to_owned());
            return;
        };

        let inputs = match data.shot_inputs(firearm_id, bullet_id) {
            Ok(inputs) => inputs,
            Err(e) => {
                log::warn!("simulate aborted: {e}");
                self.status = Some(e.to_string());
                return;
            }
        };

        let accuracy = calculate_accuracy(
            wind_speed,
            distance,
            inputs.ballistic_coefficient,
            inputs.muzzle_velocity,
            inputs.weight_grains,
        );
        if !accuracy.is_finite() {
            self.status = Some("Simulation produced a non-finite result".to_owned());
            return;
        }
        self.accuracy_percentage = Some(accuracy * 100.0);

        self.trajectory_points = if self.show_trajectory {
            let flight_time = distance / inputs.muzzle_velocity;
            Some(trajectory::wind_influence(
                inputs.muzzle_velocity,
                0.0,
                wind_speed,
                wind_angle,
                flight_time,
            ))
        } else {
            None
        };
    }

    fn ui_chart(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading("Bullet Accuracy Rate");
        });

        let percentage = self.accuracy_percentage.unwrap_or(0.0);
        let chart = BarChart::new("accuracy", vec![Bar::new(0.0, percentage).width(0.5)])
            .color(Color32::from_rgb(66, 133, 244));

        Plot::new("accuracy_plot")
            .include_x(-1.0)
            .include_x(1.0)
            .include_y(0.0)
            .include_y(100.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show_x(false)
            .y_axis_label("Accuracy Rate (%)")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(chart);
            });
    }

    fn ui_trajectory(&self, ui: &mut egui::Ui) {
        let Some(points) = self.trajectory_points.as_ref() else {
            return;
        };
        let line = Line::new("path", points.clone()).color(Color32::LIGHT_GREEN);
        Plot::new("trajectory_plot")
            .x_axis_label("Downrange (m)")
            .y_axis_label("Height (m)")
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    }
}

impl eframe::App for SimulatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(err) = &self.error_msg {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Error");
                ui.label(err);
            });
            return;
        }

        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                self.ui_form(ui);
            });

        if self.trajectory_points.is_some() {
            egui::TopBottomPanel::bottom("trajectory")
                .resizable(true)
                .min_height(160.0)
                .show(ctx, |ui| {
                    self.ui_trajectory(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.arsenal.is_some() {
                self.ui_chart(ui);
            } else {
                ui.label("No data loaded.");
            }
        });
    }
}
