//! Extraction over a realistic flattened Aragon app

use arapm_extract::{parse_contract_functions, ExtractOptions};

const FLATTENED_FINANCE: &str = r#"
pragma solidity 0.4.24;

library SafeMath {
    function add(uint256 a, uint256 b) internal pure returns (uint256) {
        return a + b;
    }
}

contract ScriptHelpers {
    function arr(address _a, uint256 _b) internal pure returns (uint256[] r) {
        r = new uint256[](2);
        r[0] = uint256(_a);
        r[1] = _b;
    }
}

contract AragonApp is ScriptHelpers {
    bytes32 public constant TRANSFER_ROLE = keccak256("TRANSFER_ROLE");

    /// @notice Send `_token` holdings to the vault
    function transferToVault(address _token) external auth(TRANSFER_ROLE) {
    }

    function getVault() public view returns (address) {
        return vault;
    }
}

contract Finance is AragonApp {
    using SafeMath for uint256;

    event NewPayment(uint256 paymentId);

    /// @notice Create a new payment of `_amount` tokens of `_token`
    /// @param _token Address of the token
    /// @param _amount Amount per payment
    function newPayment(address _token, uint256 _amount)
        external
        authP(CREATE_PAYMENTS_ROLE, arr(_token, _amount))
    {
        emit NewPayment(0);
    }

    /// @notice Execute pending payment #`_paymentId`
    function executePayment(uint256 _paymentId) external auth(EXECUTE_PAYMENTS_ROLE) {
    }
}
"#;

#[test]
fn walks_the_app_and_its_bases_in_order() {
    let functions = parse_contract_functions(
        FLATTENED_FINANCE,
        "contracts/Finance.sol",
        ExtractOptions::default(),
    )
    .unwrap();

    let sigs: Vec<&str> = functions.iter().map(|f| f.sig.as_str()).collect();
    assert_eq!(
        sigs,
        vec![
            "newPayment(address,uint256)",
            "executePayment(uint256)",
            "transferToVault(address)",
        ]
    );
}

#[test]
fn auth_p_counts_helper_call_arguments() {
    let functions = parse_contract_functions(
        FLATTENED_FINANCE,
        "Finance",
        ExtractOptions::default(),
    )
    .unwrap();

    let new_payment = &functions[0];
    assert_eq!(new_payment.roles.len(), 1);
    assert_eq!(new_payment.roles[0].id, "CREATE_PAYMENTS_ROLE");
    assert_eq!(new_payment.roles[0].param_count, 2);

    let execute = &functions[1];
    assert_eq!(execute.roles[0].id, "EXECUTE_PAYMENTS_ROLE");
    assert_eq!(execute.roles[0].param_count, 0);
}

#[test]
fn notices_join_own_and_inherited_functions() {
    let functions = parse_contract_functions(
        FLATTENED_FINANCE,
        "Finance",
        ExtractOptions::default(),
    )
    .unwrap();

    assert_eq!(
        functions[0].notice.as_deref(),
        Some("Create a new payment of `_amount` tokens of `_token`")
    );
    assert_eq!(
        functions[2].notice.as_deref(),
        Some("Send `_token` holdings to the vault")
    );
}

#[test]
fn only_target_skips_inherited_functions() {
    let functions = parse_contract_functions(
        FLATTENED_FINANCE,
        "Finance",
        ExtractOptions {
            only_target_contract: true,
        },
    )
    .unwrap();

    let sigs: Vec<&str> = functions.iter().map(|f| f.sig.as_str()).collect();
    assert_eq!(sigs, vec!["newPayment(address,uint256)", "executePayment(uint256)"]);
}

#[test]
fn unknown_target_falls_back_to_the_last_contract() {
    let functions = parse_contract_functions(
        FLATTENED_FINANCE,
        "contracts/Vault.sol",
        ExtractOptions::default(),
    )
    .unwrap();

    // Flattened output puts the app last, so the walk still starts there
    assert_eq!(functions[0].sig, "newPayment(address,uint256)");
}
