//! Genring is a linear algebra engine over generic rings.
//!
//! The same LU decomposition, determinant, rank, linear solve and reduced row echelon form
//! run over the integers, the rationals, integers modulo `n`, double precision floats and
//! real balls. Algorithms query the ring for its properties and select a strategy:
//! fraction-free elimination over the integers, plain elimination over fields, division free
//! methods over rings with zero divisors.
//!
//! For example:
//!
//! ```
//! use genring::{domains::rational::Q, tensors::matrix::Matrix};
//! use rug::Rational;
//!
//! let a = Matrix::from_i64(&[1, 2, 3, 4], 2, 2, Q).unwrap();
//! assert_eq!(a.det().unwrap(), Rational::from(-2));
//!
//! let inv = a.inv().unwrap();
//! println!("{}", inv); // {{-2,1},{3/2,-1/2}}
//! assert_eq!(&a * &inv, Matrix::identity(2, Q));
//! ```
//!
//! Predicates that a ring cannot always decide return a [Truth](truth::Truth), and fallible
//! operations return a [Status](status::Status) error that distinguishes mathematically
//! undefined results ([Status::DOMAIN](status::Status::DOMAIN)) from results that could not
//! be computed ([Status::UNABLE](status::Status::UNABLE)).

pub mod dispatch;
pub mod domains;
pub mod generic;
pub mod linalg;
pub mod settings;
pub mod status;
pub mod tensors;
pub mod truth;
