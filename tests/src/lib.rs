//! Cross-crate scenarios run against local sockets.

#[cfg(test)]
mod support;

#[cfg(test)]
mod cascade;

#[cfg(test)]
mod classification;
