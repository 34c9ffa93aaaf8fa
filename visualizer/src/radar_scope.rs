use crate::Message;
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke, Text},
    Color, Event, Point, Rectangle, Renderer, Theme, Vector,
};
use scoutcore::radar::{Gesture, PanZoom, RadarBlip, RadarConfig};

const RING_COUNT: usize = 3;
const MARGIN: f32 = 16.0;

/// Circular radar: north up, observer at the centre, pan/zoom applied on top.
pub struct RadarScope {
    blips: Vec<RadarBlip>,
    radar_radius: f64,
    view: PanZoom,
}

#[derive(Debug, Default)]
pub struct DragState {
    last: Option<Point>,
}

impl RadarScope {
    pub fn new(blips: Vec<RadarBlip>, config: &RadarConfig, view: PanZoom) -> Self {
        Self {
            blips,
            radar_radius: config.max_radius_px.max(config.display_radius_px).max(1.0),
            view,
        }
    }

    fn screen_radius(bounds: Rectangle) -> f32 {
        (bounds.width.min(bounds.height) / 2.0 - MARGIN).max(1.0)
    }
}

impl canvas::Program<Message> for RadarScope {
    type State = DragState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                cursor.position_in(bounds)?;
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => *y,
                };
                Some(canvas::Action::publish(Message::Radar(Gesture::Wheel(y as f64))).and_capture())
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                cursor.position_in(bounds)?;
                state.last = cursor.position();
                Some(canvas::Action::capture())
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                let last = state.last?;
                state.last = Some(*position);
                let delta = *position - last;
                Some(
                    canvas::Action::publish(Message::Radar(Gesture::Drag {
                        dx: delta.x as f64,
                        dy: delta.y as f64,
                    }))
                    .and_capture(),
                )
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.last.take().map(|_| canvas::Action::capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.04, 0.03),
        );

        let radius = Self::screen_radius(bounds);
        let zoom = self.view.zoom as f32;
        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0)
            + Vector::new(self.view.pan_x as f32, self.view.pan_y as f32);

        for ring in 1..=RING_COUNT {
            let ring_radius = radius * zoom * (ring as f32 / RING_COUNT as f32);
            let ring_path = Path::new(|builder| builder.circle(center, ring_radius));
            frame.stroke(
                &ring_path,
                Stroke::default().with_color(Color::from_rgb(0.15, 0.45, 0.25)),
            );
        }

        let reach = radius * zoom;
        let axes = Path::new(|builder| {
            builder.move_to(Point::new(center.x - reach, center.y));
            builder.line_to(Point::new(center.x + reach, center.y));
            builder.move_to(Point::new(center.x, center.y - reach));
            builder.line_to(Point::new(center.x, center.y + reach));
        });
        frame.stroke(
            &axes,
            Stroke::default()
                .with_color(Color::from_rgb(0.2, 0.35, 0.25))
                .with_width(1.0),
        );
        frame.fill_text(Text {
            content: "N".into(),
            position: Point::new(center.x - 4.0, center.y - reach - 14.0),
            color: Color::from_rgb(0.5, 0.8, 0.6),
            size: 12.0.into(),
            ..Text::default()
        });

        let observer = Path::new(|builder| builder.circle(center, 4.0));
        frame.fill(&observer, Color::from_rgb(0.3, 0.6, 1.0));

        let scale = radius as f64 / self.radar_radius;
        let origin = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        for blip in &self.blips {
            let (x, y) = self.view.to_screen(blip.x * scale, blip.y * scale);
            let position = origin + Vector::new(x as f32, y as f32);
            if !(0.0..=bounds.width).contains(&position.x)
                || !(0.0..=bounds.height).contains(&position.y)
            {
                continue;
            }

            let marker = Path::new(|builder| builder.circle(position, 5.0));
            if blip.direction_known {
                frame.fill(&marker, Color::from_rgb(0.95, 0.55, 0.2));
            } else {
                // placeholder direction: hollow marker
                frame.stroke(
                    &marker,
                    Stroke::default()
                        .with_color(Color::from_rgb(0.8, 0.8, 0.8))
                        .with_width(1.5),
                );
            }
            frame.fill_text(Text {
                content: if blip.distance_known {
                    blip.name.clone()
                } else {
                    format!("{} (?)", blip.name)
                },
                position: position + Vector::new(7.0, -6.0),
                color: Color::from_rgb(0.85, 0.85, 0.85),
                size: 11.0.into(),
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.last.is_some() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}
