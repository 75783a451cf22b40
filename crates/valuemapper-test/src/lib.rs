//! End-to-end tests of `valuemapper` through its derive macro.


#[cfg(test)]
mod mapping;

#[cfg(test)]
mod conversions;

#[cfg(test)]
mod batch;
