pub mod webaccessibility;
