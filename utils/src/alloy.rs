use alloy::primitives::Address;

pub trait StringExt {
    fn parse_as_address(&self) -> crate::Result<Address>;
}

impl StringExt for str {
    fn parse_as_address(&self) -> crate::Result<Address> {
        self.trim()
            .parse::<Address>()
            .map_err(|_| crate::Error::InvalidAddress(self.to_string()))
    }
}

impl StringExt for String {
    fn parse_as_address(&self) -> crate::Result<Address> {
        self.as_str().parse_as_address()
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn parses_any_case() {
        let expected = address!("c1d5892e28ea1c5ecd9fac7771b9d06802f321e0");
        assert_eq!(
            "0xc1d5892e28ea1c5ecd9fac7771b9d06802f321e0".parse_as_address().unwrap(),
            expected
        );
        assert_eq!(
            " 0xC1D5892E28EA1C5ECD9FAC7771B9D06802F321E0 ".parse_as_address().unwrap(),
            expected
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "0xAAA".parse_as_address(),
            Err(crate::Error::InvalidAddress(s)) if s == "0xAAA"
        ));
        assert!("".to_string().parse_as_address().is_err());
    }
}
