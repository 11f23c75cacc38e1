mod make_circle;
mod make_polyline;
mod make_rectangle;

pub use make_circle::MakeCircle;
pub use make_polyline::MakePolyline;
pub use make_rectangle::MakeRectangle;
