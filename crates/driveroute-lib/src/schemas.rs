//! Declared shapes of every payload the clients accept.

use once_cell::sync::Lazy;

use crate::validate::{Field, Shape};

/// `POST /route` success body: exactly `{ "token": string }`.
pub static ROUTE_TOKEN_SHAPE: Lazy<Shape> =
    Lazy::new(|| Shape::object([Field::required("token", Shape::String)]).closed());

/// `GET /route/{token}` terminal success body.
///
/// `status` may accompany the result; a path needs at least its origin and
/// destination.
pub static ROUTE_RESULT_SHAPE: Lazy<Shape> = Lazy::new(|| {
    Shape::object([
        Field::optional("status", Shape::String),
        Field::required(
            "path",
            Shape::array(Shape::Tuple(vec![Shape::String, Shape::String])).with_min_items(2),
        ),
        Field::required("total_distance", Shape::non_negative_number()),
        Field::required("total_time", Shape::non_negative_number()),
    ])
    .closed()
});

/// Places autocomplete envelope. Individual suggestions are filtered later,
/// since non-place predictions are legitimately mixed in.
pub static AUTOCOMPLETE_SHAPE: Lazy<Shape> = Lazy::new(|| {
    Shape::object([Field::required(
        "suggestions",
        Shape::array(Shape::object([])),
    )])
});

/// Directions response restricted by the `routes.polyline.encodedPolyline`
/// field mask.
pub static DIRECTIONS_SHAPE: Lazy<Shape> = Lazy::new(|| {
    let polyline = Shape::object([Field::required("encodedPolyline", Shape::String)]);
    let route = Shape::object([Field::required("polyline", polyline)]);
    Shape::object([Field::required("routes", Shape::array(route).with_min_items(1))])
});
