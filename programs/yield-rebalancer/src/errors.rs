use anchor_lang::prelude::*;

/// Custom error codes for the Yield Rebalancer program
#[error_code]
pub enum VaultError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Operation would mint or burn zero shares")]
    ZeroShares,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Vault reports zero assets while shares are outstanding")]
    InvariantViolation,

    #[msg("Invalid token mint - does not match vault asset")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Unauthorized - caller does not hold the required role")]
    Unauthorized,

    #[msg("Address must not be the default public key")]
    ZeroAddress,

    #[msg("Provider is not registered with this vault")]
    InvalidProvider,

    #[msg("Source and destination provider must differ")]
    SameProvider,

    #[msg("Provider already exists in registry")]
    ProviderAlreadyExists,

    #[msg("Provider not found in registry")]
    ProviderNotFound,

    #[msg("Provider registry is full")]
    RegistryFull,

    #[msg("Provider identifier too long - maximum 32 characters")]
    NameTooLong,

    #[msg("A vault needs at least one provider")]
    EmptyProviderSet,

    #[msg("Provider account does not match the registered market")]
    ProviderAccountMismatch,

    #[msg("Not enough provider accounts supplied")]
    MissingProviderAccounts,

    #[msg("The active provider cannot be removed")]
    ActiveProviderRemoval,

    #[msg("Provider still holds vault assets")]
    ProviderNotEmpty,

    #[msg("Insufficient provider balance for this amount")]
    InsufficientProviderBalance,

    #[msg("Fee percent exceeds its hard ceiling")]
    FeePercentTooHigh,

    #[msg("Rebalance fee exceeds the allowed share of the moved amount")]
    RebalanceFeeTooHigh,

    #[msg("Minimum amount must be greater than zero")]
    InvalidMinAmount,

    #[msg("Setup deposit is below the vault minimum amount")]
    BelowMinAmount,

    #[msg("Vault setup already completed")]
    AlreadySetup,

    #[msg("Vault setup has not been completed")]
    VaultNotSetup,

    #[msg("Owner does not hold enough shares")]
    InsufficientShares,

    #[msg("Batch arrays must have equal length")]
    ArrayLengthMismatch,

    #[msg("Batch must contain at least one entry")]
    EmptyBatch,

    #[msg("Profit fees are not enabled for this vault")]
    ProfitFeesDisabled,

    #[msg("Required account was not supplied")]
    MissingAccount,

    #[msg("Timelock delay outside allowed bounds")]
    TimelockDelayOutOfRange,

    #[msg("Timelock action is not executable yet")]
    TimelockNotReady,

    #[msg("Timelock queue is full")]
    TimelockQueueFull,

    #[msg("Timelock action not found")]
    TimelockActionNotFound,

    #[msg("Collection interval outside allowed bounds")]
    InvalidCollectionInterval,

    #[msg("Vault already registered with the fee collector")]
    VaultAlreadyRegistered,

    #[msg("Vault not registered with the fee collector")]
    VaultNotRegistered,

    #[msg("Fee collector is full")]
    CollectorFull,

    #[msg("Collection interval has not elapsed")]
    CollectionNotDue,

    #[msg("Vault authority does not match the vault PDA")]
    InvalidVaultAuthority,

    #[msg("Token account is not the vault's associated asset account")]
    InvalidVaultTokenAccount,

    #[msg("The vault's own asset account cannot serve as a provider reserve")]
    ReserveIsVaultAccount,
}
